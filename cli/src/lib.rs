//! taktgeber-cli – Bibliotheks-Root
//!
//! Verdrahtet Encoder, UDP-Transport und Signaling mit dem
//! `PacingController` und stellt den Einstiegspunkt fuer
//! Integrationstests bereit.

pub mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::CliConfig;
use taktgeber_audio::OpusEncoder;
use taktgeber_core::{Encoder, Transport};
use taktgeber_voice::{KanalSignaling, PacingController, PacingStatus, UdpTransport};
use tokio::net::UdpSocket;

/// Spielt eine rohe PCM-Datei (s16le, 48 kHz, Stereo) an das konfigurierte Ziel.
///
/// Laeuft bis die Datei zu Ende ist oder Ctrl-C die Wiedergabe stoppt.
/// Gibt den Status nach dem Drain zurueck.
pub async fn abspielen(config: &CliConfig, datei: &Path) -> Result<PacingStatus> {
    config.validieren()?;

    let bind = config.bind_adresse()?;
    let ziel = config.ziel_adresse()?;
    let socket = UdpSocket::bind(bind)
        .await
        .with_context(|| format!("UDP-Socket konnte nicht an {bind} gebunden werden"))?;
    tracing::info!(lokal = %socket.local_addr()?, ziel = %ziel, "UDP-Socket gebunden");

    let transport: Arc<dyn Transport> = Arc::new(UdpTransport::starten(
        Arc::new(socket),
        ziel,
        config.netzwerk.ssrc,
        config.netzwerk.send_queue_groesse,
    ));

    let (signaling, mut nachrichten) = KanalSignaling::neu(config.netzwerk.ssrc, transport);
    let signaling_task = tokio::spawn(async move {
        while let Some(nachricht) = nachrichten.recv().await {
            match nachricht.to_json() {
                Ok(json) => tracing::info!(nachricht = %json, "Signaling"),
                Err(e) => tracing::warn!(fehler = %e, "Signaling-Nachricht nicht serialisierbar"),
            }
        }
    });

    let mut encoder = OpusEncoder::new(config.audio.opus.clone())?;
    encoder.set_volume(config.audio.volume);

    let controller = Arc::new(PacingController::new(
        Box::new(signaling),
        Box::new(encoder),
        config.pacing.clone(),
    )?);

    let session = controller.play_file(datei)?;
    tracing::info!(%session, datei = %datei.display(), "Wiedergabe laeuft");

    let mut warter = {
        let c = Arc::clone(&controller);
        tokio::task::spawn_blocking(move || c.wait())
    };

    let ergebnis = tokio::select! {
        ergebnis = &mut warter => ergebnis.context("Warte-Task abgebrochen")?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("Ctrl-C-Handler konnte nicht registriert werden")?;
            tracing::info!("Ctrl-C empfangen, Wiedergabe wird gestoppt");
            let c = Arc::clone(&controller);
            tokio::task::spawn_blocking(move || c.stop())
                .await
                .context("Stop-Task abgebrochen")??;
            warter.await.context("Warte-Task abgebrochen")?
        }
    };

    let status = controller.status();
    controller.destroy()?;
    // Signaling-Kanal ist nach destroy geschlossen, der Task endet von selbst
    signaling_task.await.context("Signaling-Task abgebrochen")?;

    ergebnis?;
    tracing::info!(status = %status.zusammenfassung(), "Wiedergabe beendet");
    Ok(status)
}
