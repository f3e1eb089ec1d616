//! Taktgeber CLI – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und spielt die
//! als Argument uebergebene PCM-Datei ab.

use std::path::PathBuf;

use anyhow::Result;
use taktgeber_cli::{abspielen, config::CliConfig};
use taktgeber_observability::logging_initialisieren;

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("TAKTGEBER_CONFIG").unwrap_or_else(|_| "taktgeber.toml".into());

    let Some(datei) = std::env::args_os().nth(1).map(PathBuf::from) else {
        anyhow::bail!("Aufruf: taktgeber-cli <datei.pcm>  (s16le, 48 kHz, Stereo)");
    };

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let config = CliConfig::laden(&config_pfad)?;

    logging_initialisieren(&config.logging.level, &config.logging.format)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Taktgeber wird initialisiert"
    );

    abspielen(&config, &datei).await?;
    Ok(())
}
