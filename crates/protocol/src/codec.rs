//! Codec-Parameter fuer die Audio-Uebertragung
//!
//! Das Rohformat der Chunks ist fest: 48 kHz, Stereo, s16le, 20 ms.
//! Nur die Opus-Encoder-Einstellungen sind konfigurierbar.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PCM-Rohformat
// ---------------------------------------------------------------------------

/// Festes PCM-Format der Chunks, die der Pacing-Loop liest
pub struct PcmFormat;

impl PcmFormat {
    /// Abtastrate in Hz
    pub const SAMPLE_RATE: u32 = 48_000;
    /// Anzahl Kanaele (interleaved)
    pub const CHANNELS: usize = 2;
    /// Ideale Frame-Dauer in ms
    pub const FRAME_MS: f64 = 20.0;
    /// Samples pro Kanal und Frame (20 ms bei 48 kHz)
    pub const SAMPLES_PER_FRAME: usize = 960;
    /// Bytes pro Chunk: 960 Samples * 2 Kanaele * 2 Bytes
    pub const CHUNK_BYTES: usize = Self::SAMPLES_PER_FRAME * Self::CHANNELS * 2;
    /// Zeitstempel-Inkrement pro Frame (48 kHz-Ticks)
    pub const TIMESTAMP_STEP: u32 = Self::SAMPLES_PER_FRAME as u32;
}

// ---------------------------------------------------------------------------
// Opus-Konfiguration
// ---------------------------------------------------------------------------

/// Opus-Anwendungsmodus
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpusApplication {
    /// Optimiert fuer Sprachverstaendlichkeit (VOIP)
    Voip,
    /// Optimiert fuer allgemeine Audio-Qualitaet (Musik)
    #[default]
    Audio,
    /// Minimale Verarbeitungsverzoegerung
    RestrictedLowdelay,
}

/// Opus-Encoder-Einstellungen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpusConfig {
    /// Ziel-Bitrate in kbps (6–510)
    pub bitrate_kbps: u16,
    /// Anwendungsmodus
    pub application: OpusApplication,
    /// Forward Error Correction aktivieren
    pub fec_enabled: bool,
    /// Komplexitaet (0–10, hoeher = bessere Qualitaet, mehr CPU)
    pub complexity: u8,
    /// Variable Bitrate aktivieren
    pub vbr_enabled: bool,
}

impl Default for OpusConfig {
    fn default() -> Self {
        Self {
            bitrate_kbps: 64,
            application: OpusApplication::Audio,
            fec_enabled: false,
            complexity: 10,
            vbr_enabled: true,
        }
    }
}

impl OpusConfig {
    /// Validiert die Konfiguration
    pub fn validieren(&self) -> Result<(), String> {
        if self.bitrate_kbps < 6 || self.bitrate_kbps > 510 {
            return Err(format!(
                "Bitrate muss zwischen 6 und 510 kbps liegen (war: {})",
                self.bitrate_kbps
            ));
        }
        if self.complexity > 10 {
            return Err(format!(
                "Komplexitaet muss zwischen 0 und 10 liegen (war: {})",
                self.complexity
            ));
        }
        Ok(())
    }
}
