//! Audio-Paket (UDP)
//!
//! RTP-kompatibler Header gefolgt von den Opus-Nutzdaten.
//!
//! ## Paketformat (Header = 12 Bytes, kein serde)
//!
//! ```text
//! Offset  Len  Beschreibung
//! ------  ---  -----------
//!  0       1   Version/Flags (0x80)
//!  1       1   PayloadType (0x78)
//!  2       2   SequenzNummer (big-endian)
//!  4       4   Zeitstempel (big-endian, 48 kHz-Ticks)
//!  8       4   SSRC (big-endian)
//! 12+      N   Nutzdaten (Opus-Bytes)
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use std::io;

/// Erstes Header-Byte: RTP Version 2, kein Padding, keine Extension
pub const RTP_VERSION_BYTE: u8 = 0x80;

/// Payload-Type fuer Opus
pub const RTP_PAYLOAD_TYPE: u8 = 0x78;

/// Maximale Nutzdaten-Laenge (1280 Bytes, typisches Opus-MTU-Limit)
pub const MAX_NUTZDATEN_LAENGE: usize = 1280;

// ---------------------------------------------------------------------------
// AudioPacketHeader
// ---------------------------------------------------------------------------

/// 12-Byte Header eines Audio-Pakets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPacketHeader {
    /// Sequenznummer (siehe Wrap-Policy im Pacing-Loop)
    pub sequence: u16,
    /// Zeitstempel in 48 kHz-Ticks
    pub timestamp: u32,
    /// Synchronisation Source – eindeutige Senderkennung
    pub ssrc: u32,
}

impl AudioPacketHeader {
    /// Header-Groesse in Bytes
    pub const SIZE: usize = 12;

    pub fn new(sequence: u16, timestamp: u32, ssrc: u32) -> Self {
        Self {
            sequence,
            timestamp,
            ssrc,
        }
    }

    /// Serialisiert den Header in ein 12-Byte-Array (big-endian)
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0] = RTP_VERSION_BYTE;
        buf[1] = RTP_PAYLOAD_TYPE;
        buf[2..4].copy_from_slice(&self.sequence.to_be_bytes());
        buf[4..8].copy_from_slice(&self.timestamp.to_be_bytes());
        buf[8..12].copy_from_slice(&self.ssrc.to_be_bytes());
        buf
    }

    /// Deserialisiert einen Header aus einem Byte-Slice
    ///
    /// # Fehler
    /// - `InvalidData` wenn das Slice kuerzer als 12 Bytes ist
    /// - `InvalidData` bei falschem Versions- oder Payload-Type-Byte
    pub fn decode(buf: &[u8]) -> io::Result<Self> {
        if buf.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Header zu kurz: {} Bytes (erwartet {})",
                    buf.len(),
                    Self::SIZE
                ),
            ));
        }

        if buf[0] != RTP_VERSION_BYTE || buf[1] != RTP_PAYLOAD_TYPE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unbekannter Header: {:#04x} {:#04x}", buf[0], buf[1]),
            ));
        }

        Ok(Self {
            sequence: u16::from_be_bytes([buf[2], buf[3]]),
            timestamp: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            ssrc: u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]),
        })
    }
}

// ---------------------------------------------------------------------------
// AudioPacket
// ---------------------------------------------------------------------------

/// Vollstaendiges Audio-Paket (Header + Opus-Nutzdaten)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPacket {
    pub header: AudioPacketHeader,
    pub payload: Bytes,
}

impl AudioPacket {
    pub fn neu(sequence: u16, timestamp: u32, ssrc: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            header: AudioPacketHeader::new(sequence, timestamp, ssrc),
            payload: payload.into(),
        }
    }

    /// Serialisiert das gesamte Paket
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.groesse());
        buf.put_slice(&self.header.encode());
        buf.put_slice(&self.payload);
        buf.freeze()
    }

    /// Deserialisiert ein Paket und validiert die Nutzdaten-Laenge
    pub fn decode(buf: &[u8]) -> io::Result<Self> {
        let header = AudioPacketHeader::decode(buf)?;
        let payload_bytes = &buf[AudioPacketHeader::SIZE..];

        if payload_bytes.len() > MAX_NUTZDATEN_LAENGE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Nutzdaten zu lang: {} Bytes (Maximum {})",
                    payload_bytes.len(),
                    MAX_NUTZDATEN_LAENGE
                ),
            ));
        }

        Ok(Self {
            header,
            payload: Bytes::copy_from_slice(payload_bytes),
        })
    }

    /// Gesamtgroesse des Paketes in Bytes
    pub fn groesse(&self) -> usize {
        AudioPacketHeader::SIZE + self.payload.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
