//! Kanal-basierter Signaling-Adapter
//!
//! Legt Steuernachrichten in eine tokio-Queue, die der Host weiterleitet
//! (WebSocket, TCP, Log). Der Transport wird beim Erstellen uebergeben.

use std::sync::Arc;

use taktgeber_core::{Result, Signaling, TaktgeberError, Transport};
use taktgeber_protocol::ControlMessage;
use tokio::sync::mpsc;

/// Signaling ueber einen unbeschraenkten mpsc-Kanal
pub struct KanalSignaling {
    ssrc: u32,
    tx: Option<mpsc::UnboundedSender<ControlMessage>>,
    transport: Arc<dyn Transport>,
    verbunden: bool,
    speaking: bool,
}

impl KanalSignaling {
    /// Erstellt den Adapter und die Empfangsseite der Nachrichten
    pub fn neu(
        ssrc: u32,
        transport: Arc<dyn Transport>,
    ) -> (Self, mpsc::UnboundedReceiver<ControlMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                ssrc,
                tx: Some(tx),
                transport,
                verbunden: false,
                speaking: false,
            },
            rx,
        )
    }

    /// Zuletzt gemeldeter Speaking-Zustand
    pub fn ist_speaking(&self) -> bool {
        self.speaking
    }

    fn senden(&self, nachricht: ControlMessage) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| TaktgeberError::Signaling("Kanal bereits abgebaut".into()))?;
        tx.send(nachricht)
            .map_err(|_| TaktgeberError::Signaling("Empfaenger nicht mehr vorhanden".into()))
    }
}

impl Signaling for KanalSignaling {
    fn connect(&mut self) -> Result<()> {
        self.senden(ControlMessage::Hello { ssrc: self.ssrc })?;
        self.verbunden = true;
        tracing::debug!(ssrc = self.ssrc, "Signaling verbunden");
        Ok(())
    }

    fn set_speaking(&mut self, speaking: bool) -> Result<()> {
        if !self.verbunden {
            return Err(TaktgeberError::Signaling("nicht verbunden".into()));
        }
        self.senden(ControlMessage::speaking(self.ssrc, speaking))?;
        self.speaking = speaking;
        Ok(())
    }

    fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    fn destroy(&mut self) {
        if self.verbunden {
            let _ = self.senden(ControlMessage::Goodbye { ssrc: self.ssrc });
            self.verbunden = false;
        }
        self.tx = None;
        tracing::debug!(ssrc = self.ssrc, "Signaling abgebaut");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taktgeber_protocol::SpeakingUpdate;

    struct Nichts;

    impl Transport for Nichts {
        fn send_audio(&self, _frame: &[u8], _sequence: u16, _timestamp: u32) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn lebenszyklus_nachrichten() {
        let (mut sig, mut rx) = KanalSignaling::neu(7, Arc::new(Nichts));
        sig.connect().unwrap();
        sig.set_speaking(true).unwrap();
        assert!(sig.ist_speaking());
        sig.set_speaking(false).unwrap();
        sig.destroy();

        assert_eq!(rx.try_recv().unwrap(), ControlMessage::Hello { ssrc: 7 });
        assert_eq!(
            rx.try_recv().unwrap(),
            ControlMessage::Speaking(SpeakingUpdate {
                ssrc: 7,
                speaking: true,
                delay: 0
            })
        );
        assert_eq!(rx.try_recv().unwrap(), ControlMessage::speaking(7, false));
        assert_eq!(rx.try_recv().unwrap(), ControlMessage::Goodbye { ssrc: 7 });
        // Sender wurde beim Abbau gedroppt
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn speaking_ohne_connect_ist_fehler() {
        let (mut sig, _rx) = KanalSignaling::neu(1, Arc::new(Nichts));
        assert!(matches!(
            sig.set_speaking(true),
            Err(TaktgeberError::Signaling(_))
        ));
    }

    #[test]
    fn nach_destroy_kein_speaking() {
        let (mut sig, _rx) = KanalSignaling::neu(1, Arc::new(Nichts));
        sig.connect().unwrap();
        sig.destroy();
        assert!(sig.set_speaking(false).is_err());
    }

    #[test]
    fn transport_wird_geteilt() {
        let transport: Arc<dyn Transport> = Arc::new(Nichts);
        let (sig, _rx) = KanalSignaling::neu(1, Arc::clone(&transport));
        assert!(Arc::ptr_eq(&sig.transport(), &transport));
    }

    #[test]
    fn empfaenger_weg_ist_signalingfehler() {
        let (mut sig, rx) = KanalSignaling::neu(1, Arc::new(Nichts));
        drop(rx);
        assert!(sig.connect().is_err());
    }
}
