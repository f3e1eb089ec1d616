//! Sequenz- und Zeitstempel-Zaehler
//!
//! Wrap-Policy mit fester Reserve statt Modulo: liegt der Zaehler innerhalb
//! der Reserve vor dem Maximum, springt er auf 0 statt weiterzuzaehlen.
//! Empfaenger tolerieren diesen Sprung, aber keinen Ueberlauf.

use taktgeber_protocol::PcmFormat;

/// Reserve der 16-Bit-Sequenz vor dem Maximum
pub const SEQUENCE_MARGIN: u32 = 10;

/// Reserve des 32-Bit-Zeitstempels (10 Frames)
pub const TIMESTAMP_MARGIN: u64 = 9600;

/// Zeitstempel-Inkrement pro Frame
pub const TIMESTAMP_STEP: u32 = PcmFormat::TIMESTAMP_STEP;

/// Naechste Sequenznummer nach der Wrap-Policy
pub fn next_sequence(sequence: u16) -> u16 {
    if sequence as u32 + SEQUENCE_MARGIN < u16::MAX as u32 {
        sequence + 1
    } else {
        0
    }
}

/// Naechster Zeitstempel nach der Wrap-Policy
pub fn next_timestamp(timestamp: u32) -> u32 {
    if timestamp as u64 + TIMESTAMP_MARGIN < u32::MAX as u64 {
        timestamp + TIMESTAMP_STEP
    } else {
        0
    }
}

/// Sequenz/Zeitstempel-Paar einer Session
///
/// Wird ueber Wiedergaben hinweg weitergereicht und nie zurueckgesetzt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketCounter {
    sequence: u16,
    timestamp: u32,
}

impl PacketCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startet bei beliebigen Werten (fuer Tests und Wiederaufnahme)
    pub fn starting_at(sequence: u16, timestamp: u32) -> Self {
        Self {
            sequence,
            timestamp,
        }
    }

    /// Rueckt beide Zaehler vor und gibt die neuen Werte zurueck
    pub fn advance(&mut self) -> (u16, u32) {
        self.sequence = next_sequence(self.sequence);
        self.timestamp = next_timestamp(self.timestamp);
        (self.sequence, self.timestamp)
    }

    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }
}
