//! Fehlertypen fuer Taktgeber
//!
//! Zentraler Fehler-Enum fuer Controller und Kollaborateure.
//! Untercrates koennen eigene Fehler definieren und via `From` konvertieren.

use thiserror::Error;

/// Globaler Result-Alias fuer Taktgeber
pub type Result<T> = std::result::Result<T, TaktgeberError>;

/// Alle moeglichen Fehler im Taktgeber-System
#[derive(Debug, Error)]
pub enum TaktgeberError {
    // --- Kollaborateure ---
    #[error("Codec-Fehler: {0}")]
    Codec(String),

    #[error("Transport-Fehler: {0}")]
    Transport(String),

    #[error("Signaling-Fehler: {0}")]
    Signaling(String),

    // --- Wiedergabe ---
    #[error("Zu viele Transport-Fehler in Folge: {0}")]
    TransportAbbruch(u32),

    #[error("Controller wurde bereits zerstoert")]
    Zerstoert,

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl TaktgeberError {
    /// Erstellt einen internen Fehler aus einer beliebigen Nachricht
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }

    /// Gibt true zurueck wenn der Fehler die laufende Session beendet
    pub fn ist_fatal(&self) -> bool {
        !matches!(self, Self::Transport(_) | Self::Signaling(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fehler_anzeige() {
        let e = TaktgeberError::Codec("Frame zu kurz".into());
        assert_eq!(e.to_string(), "Codec-Fehler: Frame zu kurz");
    }

    #[test]
    fn fatal_erkennung() {
        assert!(TaktgeberError::Codec("x".into()).ist_fatal());
        assert!(TaktgeberError::Zerstoert.ist_fatal());
        assert!(!TaktgeberError::Transport("x".into()).ist_fatal());
        assert!(!TaktgeberError::Signaling("x".into()).ist_fatal());
    }

    #[test]
    fn io_fehler_konvertierung() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "weg");
        let e: TaktgeberError = io.into();
        assert!(e.to_string().starts_with("IO-Fehler"));
    }
}
