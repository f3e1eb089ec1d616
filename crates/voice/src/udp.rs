//! UDP-Transport mit Send-Queue
//!
//! Der Pacing-Thread ist synchron; Pakete werden daher per `try_send` in
//! eine tokio-mpsc-Queue gelegt und von einem eigenen Task per `send_to`
//! verschickt.
//!
//! ```text
//! Pacing-Thread --send_audio--> AudioPacket::encode()
//!     --try_send--> mpsc-Queue --> UDP send_to Task --> Ziel
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use taktgeber_core::{Result, TaktgeberError, Transport};
use taktgeber_protocol::AudioPacket;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;

/// Best-Effort-Transport ueber UDP
///
/// Wenn dieses Handle gedroppt wird, endet der Sende-Task.
pub struct UdpTransport {
    tx: mpsc::Sender<Bytes>,
    ssrc: u32,
    ziel: SocketAddr,
    _task: tokio::task::JoinHandle<()>,
}

impl UdpTransport {
    /// Startet den Sende-Task fuer `ziel`
    ///
    /// Muss innerhalb einer tokio-Runtime aufgerufen werden.
    pub fn starten(
        socket: Arc<UdpSocket>,
        ziel: SocketAddr,
        ssrc: u32,
        queue_groesse: usize,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<Bytes>(queue_groesse.max(1));

        let task = tokio::spawn(async move {
            while let Some(daten) = rx.recv().await {
                match socket.send_to(&daten, ziel).await {
                    Ok(_) => {
                        tracing::trace!(bytes = daten.len(), ziel = %ziel, "UDP-Paket gesendet");
                    }
                    Err(e) => {
                        tracing::warn!(fehler = %e, ziel = %ziel, "UDP-Sendefehler");
                    }
                }
            }
            tracing::debug!(ziel = %ziel, "Sende-Task beendet");
        });

        Self {
            tx,
            ssrc,
            ziel,
            _task: task,
        }
    }

    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    pub fn ziel(&self) -> SocketAddr {
        self.ziel
    }
}

impl Transport for UdpTransport {
    fn send_audio(&self, frame: &[u8], sequence: u16, timestamp: u32) -> Result<()> {
        let paket = AudioPacket::neu(sequence, timestamp, self.ssrc, Bytes::copy_from_slice(frame));
        self.tx.try_send(paket.encode()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                TaktgeberError::Transport("Send-Queue voll".into())
            }
            mpsc::error::TrySendError::Closed(_) => {
                TaktgeberError::Transport("Sende-Task beendet".into())
            }
        })
    }
}
