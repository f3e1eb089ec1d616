//! Beobachtbarer Session-Status
//!
//! Wird nur vom Pacing-Thread geschrieben und von beliebigen Threads
//! gelesen (`parking_lot::RwLock`).

use taktgeber_core::{SessionId, SessionState};

use crate::timing::IDEAL_LENGTH_MS;

/// Momentaufnahme einer Wiedergabe
#[derive(Debug, Clone)]
pub struct PacingStatus {
    /// Aktuelle bzw. letzte Session
    pub session: Option<SessionId>,
    /// Zustand der Session
    pub zustand: SessionState,
    /// Gesendete Frames dieser Session
    pub frames_gesendet: u64,
    /// Verstrichene Stream-Zeit in Sekunden
    pub stream_time: f64,
    /// Aktuelle Frame-Laenge in ms
    pub frame_length_ms: f64,
    /// Zuletzt vergebene Sequenznummer
    pub sequence: u16,
    /// Zuletzt vergebener Zeitstempel
    pub timestamp: u32,
    /// Underruns (kurze Chunks) dieser Session
    pub underruns: u64,
    /// Fehlgeschlagene Transport-Sendungen dieser Session
    pub transport_fehler: u64,
}

impl Default for PacingStatus {
    fn default() -> Self {
        Self {
            session: None,
            zustand: SessionState::Idle,
            frames_gesendet: 0,
            stream_time: 0.0,
            frame_length_ms: IDEAL_LENGTH_MS,
            sequence: 0,
            timestamp: 0,
            underruns: 0,
            transport_fehler: 0,
        }
    }
}

impl PacingStatus {
    /// Setzt die Per-Session-Zaehler fuer eine neue Wiedergabe zurueck
    pub(crate) fn neue_session(&mut self, id: SessionId) {
        self.session = Some(id);
        self.zustand = SessionState::Playing;
        self.frames_gesendet = 0;
        self.stream_time = 0.0;
        self.frame_length_ms = IDEAL_LENGTH_MS;
        self.underruns = 0;
        self.transport_fehler = 0;
    }

    /// Gibt eine lesbare Zusammenfassung zurueck
    pub fn zusammenfassung(&self) -> String {
        format!(
            "{:?}: {} Frames ({:.2}s), Laenge={:.2}ms, seq={}, ts={}, Underruns={}, Transport-Fehler={}",
            self.zustand,
            self.frames_gesendet,
            self.stream_time,
            self.frame_length_ms,
            self.sequence,
            self.timestamp,
            self.underruns,
            self.transport_fehler,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status() {
        let s = PacingStatus::default();
        assert_eq!(s.zustand, SessionState::Idle);
        assert!((s.frame_length_ms - 20.0).abs() < f64::EPSILON);
        assert!(s.session.is_none());
    }

    #[test]
    fn neue_session_behaelt_zaehler() {
        let mut s = PacingStatus {
            frames_gesendet: 12,
            sequence: 12,
            timestamp: 11_520,
            underruns: 2,
            ..Default::default()
        };
        s.neue_session(SessionId::new());
        assert_eq!(s.frames_gesendet, 0);
        assert_eq!(s.underruns, 0);
        assert_eq!(s.sequence, 12);
        assert_eq!(s.timestamp, 11_520);
        assert_eq!(s.zustand, SessionState::Playing);
    }

    #[test]
    fn zusammenfassung_enthaelt_werte() {
        let s = PacingStatus {
            frames_gesendet: 5,
            stream_time: 0.1,
            ..Default::default()
        };
        let text = s.zusammenfassung();
        assert!(text.contains("5 Frames"));
        assert!(text.contains("0.10s"));
    }
}
