//! Schnittstellen zu den Kollaborateuren des Pacing-Controllers
//!
//! Encoder, Transport und Signaling werden vom Host bereitgestellt.
//! Der Controller kennt nur diese Traits.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// Ergebnis eines Lesevorgangs aus einer Chunk-Quelle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// Vollstaendiger Chunk mit exakt einer Frame-Laenge Rohdaten
    Full(Vec<u8>),
    /// Zu wenig Daten, die Quelle kann aber noch mehr liefern (Underrun)
    Short(Vec<u8>),
    /// Quelle endgueltig erschoepft
    End,
}

/// Lazy-Sequenz roher Audio-Chunks fester Groesse
///
/// Nicht neu startbar; nach `Chunk::End` kommt nichts mehr.
pub trait ChunkSource: Send {
    /// Liest den naechsten Chunk
    fn read_chunk(&mut self) -> std::io::Result<Chunk>;

    /// Gibt die Quelle frei. Wird beim Drain genau einmal aufgerufen.
    fn close(&mut self) {}
}

/// Audio-Encoder: Rohdaten-Chunk -> kodierter Frame
pub trait Encoder: Send {
    /// Kodiert einen Chunk. Falsche Chunk-Groesse ist ein Codec-Fehler.
    fn encode(&mut self, chunk: &[u8]) -> Result<Vec<u8>>;

    /// Erzeugt eine Chunk-Quelle aus einer Datei
    fn encode_file(&self, path: &Path) -> Result<Box<dyn ChunkSource>>;

    /// Erzeugt eine Chunk-Quelle aus einem beliebigen Byte-Stream
    fn encode_io(&self, reader: Box<dyn Read + Send>) -> Result<Box<dyn ChunkSource>>;

    /// Aktuelle Lautstaerke (1.0 = unveraendert)
    fn volume(&self) -> f32;

    /// Setzt die Lautstaerke; wirkt ab dem naechsten Frame
    fn set_volume(&mut self, volume: f32);

    /// Gibt Encoder-Ressourcen frei
    fn destroy(&mut self) {}
}

/// Best-Effort-Transport fuer kodierte Frames
///
/// Fire-and-forget: ein `Err` dient nur Logging und Abbruch-Strategie.
pub trait Transport: Send + Sync {
    fn send_audio(&self, frame: &[u8], sequence: u16, timestamp: u32) -> Result<()>;
}

/// Signaling-Kanal: Session-Lifecycle und Speaking-Indikator
pub trait Signaling: Send {
    /// Baut die Session auf
    fn connect(&mut self) -> Result<()>;

    /// Meldet der Gegenseite ob gerade Audio gesendet wird
    fn set_speaking(&mut self, speaking: bool) -> Result<()>;

    /// Transport-Handle dieser Session
    fn transport(&self) -> Arc<dyn Transport>;

    /// Baut die Session ab
    fn destroy(&mut self);
}
