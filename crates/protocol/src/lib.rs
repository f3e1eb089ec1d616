//! taktgeber-protocol – Paket- und Nachrichtenformate
//!
//! Definiert das Audio-Paket fuer den UDP-Transport, die Steuernachrichten
//! des Signaling-Kanals und die festen PCM-/Opus-Parameter.

pub mod codec;
pub mod control;
pub mod voice;

pub use codec::{OpusConfig, PcmFormat};
pub use control::{ControlMessage, SpeakingUpdate};
pub use voice::{AudioPacket, AudioPacketHeader};
