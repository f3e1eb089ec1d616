//! Fehlertypen fuer die Audio-Adapter

use taktgeber_core::TaktgeberError;
use thiserror::Error;

/// Alle moeglichen Fehler der Audio-Adapter
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Codec-Fehler: {0}")]
    CodecFehler(String),

    #[error("Chunk hat falsche Groesse: {erhalten} Bytes (erwartet {erwartet})")]
    FalscheChunkGroesse { erwartet: usize, erhalten: usize },

    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unerwarteter Fehler: {0}")]
    Anyhow(#[from] anyhow::Error),
}

pub type AudioResult<T> = Result<T, AudioError>;

impl From<AudioError> for TaktgeberError {
    fn from(e: AudioError) -> Self {
        match e {
            AudioError::Io(io) => TaktgeberError::Io(io),
            AudioError::Konfiguration(msg) => TaktgeberError::Konfiguration(msg),
            andere => TaktgeberError::Codec(andere.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_groesse_wird_codec_fehler() {
        let e: TaktgeberError = AudioError::FalscheChunkGroesse {
            erwartet: 3840,
            erhalten: 10,
        }
        .into();
        assert!(matches!(e, TaktgeberError::Codec(_)));
        assert!(e.to_string().contains("3840"));
    }

    #[test]
    fn io_bleibt_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "fehlt");
        let e: TaktgeberError = AudioError::Io(io).into();
        assert!(matches!(e, TaktgeberError::Io(_)));
    }
}
