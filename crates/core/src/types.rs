//! Gemeinsame Typen fuer Taktgeber

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige ID einer Wiedergabe-Session (fuer Log-Spans)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Erstellt eine neue zufaellige SessionId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session:{}", self.0)
    }
}

/// Zustand einer Wiedergabe-Session
///
/// ```text
/// Idle --play--> Playing <--pause/continue--> Paused
/// Playing|Paused --(stop | Quelle leer | Retries erschoepft)--> Stopping --> Stopped
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Noch nie eine Quelle angehaengt
    #[default]
    Idle,
    /// Pacing-Loop sendet Frames
    Playing,
    /// Pacing-Loop wartet auf `continue`
    Paused,
    /// Drain laeuft (Quelle freigegeben, Speaking-Signal steht noch)
    Stopping,
    /// Loop beendet
    Stopped,
}

impl SessionState {
    /// Gibt true zurueck solange eine Quelle angehaengt ist
    pub fn ist_aktiv(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}
