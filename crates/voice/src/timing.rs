//! Adaptive Frame-Laenge
//!
//! Misst periodisch, wie lange Lesen, Kodieren und Senden eines Frames
//! dauern, und zieht diese Zeit vom Takt-Schlaf ab. So bleibt die
//! Wanduhr-Kadenz auch unter CPU-Last nahe an Echtzeit.

use std::time::{Duration, Instant};

use taktgeber_protocol::PcmFormat;

use crate::config::PacingConfig;

/// Ideale Frame-Laenge in ms
pub const IDEAL_LENGTH_MS: f64 = PcmFormat::FRAME_MS;

/// Nominale Frame-Dauer
pub const NOMINAL_FRAME: Duration = Duration::from_millis(20);

/// Schaetzt die reale Dauer eines Frames
#[derive(Debug, Clone)]
pub struct FrameTimer {
    length_ms: f64,
    window: Option<Instant>,
    interval: u64,
    offset: u64,
    average: bool,
}

impl FrameTimer {
    pub fn new(config: &PacingConfig) -> Self {
        Self {
            length_ms: IDEAL_LENGTH_MS,
            window: None,
            interval: config.adjust_interval.max(1),
            offset: config.adjust_offset,
            average: config.adjust_average,
        }
    }

    /// Oeffnet ein Messfenster, wenn `frame_index` ein Korrekturpunkt ist
    pub fn sample_point(&mut self, frame_index: u64) {
        self.sample_point_at(frame_index, Instant::now());
    }

    pub fn sample_point_at(&mut self, frame_index: u64, now: Instant) {
        if frame_index % self.interval == self.offset {
            self.window = Some(now);
        }
    }

    /// Schliesst ein offenes Messfenster und korrigiert die Frame-Laenge.
    ///
    /// Gibt die neue Laenge zurueck, falls korrigiert wurde.
    pub fn correct(&mut self, now: Instant) -> Option<f64> {
        let start = self.window.take()?;
        let elapsed = now.checked_duration_since(start)?;
        Some(self.apply_elapsed(elapsed.as_secs_f64() * 1000.0))
    }

    /// Wendet eine gemessene Verarbeitungszeit (ms) an
    pub fn apply_elapsed(&mut self, elapsed_ms: f64) -> f64 {
        let direkt = IDEAL_LENGTH_MS - elapsed_ms;
        self.length_ms = if self.average {
            (direkt + self.length_ms) / 2.0
        } else {
            direkt
        };
        self.length_ms
    }

    /// Aktuell geschaetzte Frame-Laenge in ms
    pub fn length_ms(&self) -> f64 {
        self.length_ms
    }

    /// Ob gerade ein Messfenster offen ist
    pub fn window_open(&self) -> bool {
        self.window.is_some()
    }

    /// Schlafdauer fuer den naechsten Takt (negative Laengen werden zu 0)
    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs_f64(self.length_ms.max(0.0) / 1000.0)
    }
}
