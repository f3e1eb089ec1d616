//! Opus-Encoder-Adapter
//!
//! Kapselt audiopus und kodiert rohe s16le-Chunks (48 kHz Stereo, 20 ms).
//! Die Lautstaerke wird vor dem Encoding auf die Samples angewendet.

use std::io::Read;
use std::path::Path;

use audiopus::{coder::Encoder as AudiopusEncoder, Application, Bitrate, Channels, SampleRate};
use taktgeber_core::{ChunkSource, Encoder, Result};
use taktgeber_protocol::codec::{OpusApplication, OpusConfig, PcmFormat};
use tracing::debug;

use crate::error::{AudioError, AudioResult};
use crate::source::PcmSource;
use crate::volume::{s16le_zu_samples, Volume};

/// Maximale Groesse eines Opus-Frames in Bytes
const MAX_OPUS_FRAME: usize = 4000;

/// Opus-Encoder fuer den Pacing-Controller
pub struct OpusEncoder {
    encoder: Option<AudiopusEncoder>,
    config: OpusConfig,
    volume: Volume,
}

impl OpusEncoder {
    /// Erstellt einen neuen Encoder mit der gegebenen Konfiguration
    pub fn new(config: OpusConfig) -> AudioResult<Self> {
        config.validieren().map_err(AudioError::Konfiguration)?;

        let mut encoder = AudiopusEncoder::new(
            SampleRate::Hz48000,
            Channels::Stereo,
            application_to_audiopus(config.application),
        )
        .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        encoder
            .set_bitrate(Bitrate::BitsPerSecond(
                (config.bitrate_kbps as i32) * 1000,
            ))
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        // audiopus 0.2 erwartet u8
        encoder
            .set_complexity(config.complexity)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        encoder
            .set_vbr(config.vbr_enabled)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        encoder
            .set_inband_fec(config.fec_enabled)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        debug!(
            "OpusEncoder erstellt: {}kbps, {:?}, chunk={} Bytes",
            config.bitrate_kbps,
            config.application,
            PcmFormat::CHUNK_BYTES
        );

        Ok(Self {
            encoder: Some(encoder),
            config,
            volume: Volume::default(),
        })
    }

    /// Kodiert einen Chunk; Fehlertyp aus diesem Crate
    pub fn encode_chunk(&mut self, chunk: &[u8]) -> AudioResult<Vec<u8>> {
        if chunk.len() != PcmFormat::CHUNK_BYTES {
            return Err(AudioError::FalscheChunkGroesse {
                erwartet: PcmFormat::CHUNK_BYTES,
                erhalten: chunk.len(),
            });
        }

        let encoder = self
            .encoder
            .as_mut()
            .ok_or_else(|| AudioError::CodecFehler("Encoder wurde freigegeben".into()))?;

        let mut samples = s16le_zu_samples(chunk);
        self.volume.apply(&mut samples);

        let mut output = vec![0u8; MAX_OPUS_FRAME];
        let written = encoder
            .encode(&samples, &mut output)
            .map_err(|e| AudioError::CodecFehler(e.to_string()))?;

        output.truncate(written);
        Ok(output)
    }

    /// Gibt die aktuelle Konfiguration zurueck
    pub fn config(&self) -> &OpusConfig {
        &self.config
    }
}

impl Encoder for OpusEncoder {
    fn encode(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
        Ok(self.encode_chunk(chunk)?)
    }

    fn encode_file(&self, path: &Path) -> Result<Box<dyn ChunkSource>> {
        Ok(Box::new(PcmSource::open(path)?))
    }

    fn encode_io(&self, reader: Box<dyn Read + Send>) -> Result<Box<dyn ChunkSource>> {
        Ok(Box::new(PcmSource::new(reader)))
    }

    fn volume(&self) -> f32 {
        self.volume.get()
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Volume::new(volume);
    }

    fn destroy(&mut self) {
        if self.encoder.take().is_some() {
            debug!("OpusEncoder freigegeben");
        }
    }
}

fn application_to_audiopus(app: OpusApplication) -> Application {
    match app {
        OpusApplication::Voip => Application::Voip,
        OpusApplication::Audio => Application::Audio,
        OpusApplication::RestrictedLowdelay => Application::LowDelay,
    }
}
