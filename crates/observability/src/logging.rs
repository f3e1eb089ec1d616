//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable (hat Vorrang vor der Config-Datei):
//! - `TG_LOG_LEVEL`: Filter-Direktive (z.B. `info` oder `taktgeber_voice=trace`)
//! - `TG_LOG_FORMAT`: Format (text/json), Standard: text
//!
//! Die Session-ID des Pacing-Loops erscheint als Span-Feld.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{fmt as tfmt, EnvFilter};

/// Umgebungsvariable fuer den Log-Filter
pub const ENV_LOG_LEVEL: &str = "TG_LOG_LEVEL";

/// Umgebungsvariable fuer das Log-Format
pub const ENV_LOG_FORMAT: &str = "TG_LOG_FORMAT";

/// Ausgabeformat der Logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            andere => Err(format!("Unbekanntes Log-Format: '{}'", andere)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Initialisiert das Logging-System.
///
/// `level` und `format` stammen aus der Config und gelten nur, wenn die
/// Umgebungsvariablen nicht gesetzt sind. Ein ungueltiger Filter faellt
/// auf `info` zurueck, ein ungueltiges Format auf `text`.
pub fn logging_initialisieren(level: &str, format: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format = format_waehlen(std::env::var(ENV_LOG_FORMAT).ok().as_deref(), format);

    match format {
        LogFormat::Json => tfmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_names(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => tfmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_names(true)
            .try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Logging bereits initialisiert: {}", e))
}

/// Waehlt das Format: Umgebung vor Config, ungueltige Werte werden ignoriert
pub fn format_waehlen(aus_env: Option<&str>, aus_config: &str) -> LogFormat {
    aus_env
        .and_then(|s| s.parse().ok())
        .or_else(|| aus_config.parse().ok())
        .unwrap_or_default()
}

/// Validiert ob ein einfacher Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}
