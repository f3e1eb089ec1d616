//! CLI-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass die CLI ohne Konfigurationsdatei
//! lauffaehig ist.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use taktgeber_protocol::OpusConfig;
use taktgeber_voice::PacingConfig;

/// Vollstaendige CLI-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Pacing-Parameter
    pub pacing: PacingConfig,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Encoder-Einstellungen
    pub audio: AudioEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Lokale Bind-Adresse des UDP-Sockets
    pub bind_adresse: String,
    /// Empfaenger der Audio-Pakete
    pub ziel: String,
    /// Senderkennung im Paket-Header
    pub ssrc: u32,
    /// Groesse der Send-Queue zwischen Pacing-Thread und UDP-Task
    pub send_queue_groesse: usize,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0:0".into(),
            ziel: "127.0.0.1:5004".into(),
            ssrc: 1,
            send_queue_groesse: 128,
        }
    }
}

/// Encoder-Einstellungen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioEinstellungen {
    /// Lautstaerke (1.0 = unveraendert, max. 2.0)
    pub volume: f32,
    /// Opus-Parameter
    #[serde(flatten)]
    pub opus: OpusConfig,
}

impl Default for AudioEinstellungen {
    fn default() -> Self {
        Self {
            volume: 1.0,
            opus: OpusConfig::default(),
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl CliConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft alle Sektionen auf gueltige Werte
    pub fn validieren(&self) -> anyhow::Result<()> {
        self.pacing.validieren()?;
        self.audio
            .opus
            .validieren()
            .map_err(|e| anyhow::anyhow!("[audio] {e}"))?;
        self.bind_adresse()?;
        self.ziel_adresse()?;
        Ok(())
    }

    /// Gibt die lokale UDP-Adresse zurueck
    pub fn bind_adresse(&self) -> anyhow::Result<SocketAddr> {
        self.netzwerk
            .bind_adresse
            .parse()
            .map_err(|e| anyhow::anyhow!("Ungueltige Bind-Adresse '{}': {e}", self.netzwerk.bind_adresse))
    }

    /// Gibt die Zieladresse der Audio-Pakete zurueck
    pub fn ziel_adresse(&self) -> anyhow::Result<SocketAddr> {
        self.netzwerk
            .ziel
            .parse()
            .map_err(|e| anyhow::anyhow!("Ungueltige Zieladresse '{}': {e}", self.netzwerk.ziel))
    }
}
