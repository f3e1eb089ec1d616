//! taktgeber-core – Gemeinsame Typen, Traits und Fehlertypen
//!
//! Dieses Crate stellt die Bausteine bereit, die vom Pacing-Controller und
//! den Adaptern (Encoder, Transport, Signaling) gemeinsam genutzt werden.

pub mod error;
pub mod traits;
pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use error::{Result, TaktgeberError};
pub use traits::{Chunk, ChunkSource, Encoder, Signaling, Transport};
pub use types::{SessionId, SessionState};
