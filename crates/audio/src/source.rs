//! PCM-Chunk-Quellen
//!
//! Liest rohes s16le-PCM (48 kHz Stereo) aus einem `Read` und zerlegt es in
//! Chunks zu je 20 ms. Unterscheidet dabei:
//! - `Chunk::End`: Stream ist am Ende (EOF oder Quelle geschlossen)
//! - `Chunk::Short`: gerade nicht genug Daten (`WouldBlock` oder Rest vor EOF)

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use taktgeber_core::{Chunk, ChunkSource};
use taktgeber_protocol::PcmFormat;
use tracing::debug;

use crate::error::AudioResult;

/// Chunk-Quelle ueber einem beliebigen Byte-Stream
pub struct PcmSource<R> {
    reader: Option<R>,
    chunk_bytes: usize,
    eof: bool,
}

impl<R: Read + Send> PcmSource<R> {
    /// Erstellt eine Quelle mit der Standard-Chunk-Groesse (3840 Bytes)
    pub fn new(reader: R) -> Self {
        Self::with_chunk_bytes(reader, PcmFormat::CHUNK_BYTES)
    }

    pub fn with_chunk_bytes(reader: R, chunk_bytes: usize) -> Self {
        Self {
            reader: Some(reader),
            chunk_bytes,
            eof: false,
        }
    }

    /// Gibt die Chunk-Groesse in Bytes zurueck
    pub fn chunk_bytes(&self) -> usize {
        self.chunk_bytes
    }
}

impl PcmSource<BufReader<File>> {
    /// Oeffnet eine Datei mit rohem s16le-PCM
    pub fn open(path: &Path) -> AudioResult<Self> {
        let file = File::open(path)?;
        debug!(pfad = %path.display(), "PCM-Datei geoeffnet");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read + Send> ChunkSource for PcmSource<R> {
    fn read_chunk(&mut self) -> std::io::Result<Chunk> {
        let reader = match self.reader.as_mut() {
            Some(r) if !self.eof => r,
            _ => return Ok(Chunk::End),
        };

        let mut buf = vec![0u8; self.chunk_bytes];
        let mut gelesen = 0;

        while gelesen < self.chunk_bytes {
            match reader.read(&mut buf[gelesen..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => gelesen += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                // Nicht-blockierender Stream ohne Daten: Underrun, kein Ende
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => return Err(e),
            }
        }

        if gelesen == self.chunk_bytes {
            Ok(Chunk::Full(buf))
        } else if gelesen == 0 && self.eof {
            Ok(Chunk::End)
        } else {
            buf.truncate(gelesen);
            Ok(Chunk::Short(buf))
        }
    }

    fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!("PCM-Quelle geschlossen");
        }
    }
}
