//! taktgeber-audio – Audio-Adapter
//!
//! Konkrete Kollaborateure fuer den Pacing-Controller:
//! - Opus-Encoding roher s16le-Chunks (48 kHz Stereo, 20 ms)
//! - Chunk-Quellen aus Dateien und beliebigen Byte-Streams
//! - Lautstaerke-Skalierung vor dem Encoding

pub mod codec;
pub mod error;
pub mod source;
pub mod volume;

// Bequeme Re-Exporte der wichtigsten Typen
pub use codec::OpusEncoder;
pub use error::{AudioError, AudioResult};
pub use source::PcmSource;
pub use volume::Volume;
