//! Steuernachrichten des Signaling-Kanals
//!
//! JSON-Serialisierung via serde (nicht zeitkritisch).
//! Tagged Enum fuer typsichere Nachrichtentypen.

use serde::{Deserialize, Serialize};

/// Speaking-Indikator einer Audio-Quelle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakingUpdate {
    /// Senderkennung (identisch mit der SSRC im Audio-Paket)
    pub ssrc: u32,
    /// Ob gerade Audio gesendet wird
    pub speaking: bool,
    /// Verzoegerung in ms, die der Empfaenger einplanen soll
    pub delay: u32,
}

/// Alle Nachrichten, die der Signaling-Adapter versendet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Session wird aufgebaut
    Hello { ssrc: u32 },
    /// Speaking-Indikator hat sich geaendert
    Speaking(SpeakingUpdate),
    /// Session wird abgebaut
    Goodbye { ssrc: u32 },
}

impl ControlMessage {
    /// Erstellt eine Speaking-Nachricht ohne Verzoegerung
    pub fn speaking(ssrc: u32, speaking: bool) -> Self {
        Self::Speaking(SpeakingUpdate {
            ssrc,
            speaking,
            delay: 0,
        })
    }

    /// Serialisiert die Nachricht als JSON-Zeile
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaking_nachricht_json_format() {
        let json = ControlMessage::speaking(42, true).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"speaking","data":{"ssrc":42,"speaking":true,"delay":0}}"#
        );
    }

    #[test]
    fn hello_serde() {
        let msg = ControlMessage::Hello { ssrc: 7 };
        let json = msg.to_json().unwrap();
        let decoded: ControlMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn unbekannter_typ_wird_abgelehnt() {
        let result = serde_json::from_str::<ControlMessage>(r#"{"type":"dance","data":{}}"#);
        assert!(result.is_err());
    }
}
