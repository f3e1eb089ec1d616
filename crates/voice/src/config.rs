//! Pacing-Konfiguration
//!
//! Alle Felder haben Standardwerte, sodass eine leere TOML-Sektion genuegt.

use serde::{Deserialize, Serialize};
use taktgeber_core::{Result, TaktgeberError};

/// Parameter des Pacing-Loops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Abstand der Laengenkorrekturen in Frames
    pub adjust_interval: u64,
    /// Erster Korrektur-Frame (Aufwaermphase wird uebersprungen)
    pub adjust_offset: u64,
    /// Laufender Mittelwert statt direkter Korrektur
    pub adjust_average: bool,
    /// Erlaubte aufeinanderfolgende Underruns vor dem Abbruch
    pub retry_attempts: u32,
    /// Abbruch nach so vielen Transport-Fehlern in Folge (None = nie)
    pub transport_fehler_limit: Option<u32>,
    /// Kapazitaet der Kommando-Queue zum Pacing-Thread
    pub command_queue: usize,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            adjust_interval: 100,
            adjust_offset: 10,
            adjust_average: false,
            retry_attempts: 3,
            transport_fehler_limit: None,
            command_queue: 64,
        }
    }
}

impl PacingConfig {
    /// Validiert die Konfiguration
    pub fn validieren(&self) -> Result<()> {
        if self.adjust_interval == 0 {
            return Err(TaktgeberError::Konfiguration(
                "adjust_interval muss groesser als 0 sein".into(),
            ));
        }
        if self.command_queue == 0 {
            return Err(TaktgeberError::Konfiguration(
                "command_queue muss groesser als 0 sein".into(),
            ));
        }
        if self.transport_fehler_limit == Some(0) {
            return Err(TaktgeberError::Konfiguration(
                "transport_fehler_limit 0 wuerde jede Wiedergabe sofort abbrechen".into(),
            ));
        }
        Ok(())
    }
}
