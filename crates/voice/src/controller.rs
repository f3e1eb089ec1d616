//! PacingController – oeffentliche API einer Wiedergabe
//!
//! Besitzt Encoder und Signaling, startet pro `play` einen Pacing-Thread
//! und steuert ihn ueber eine crossbeam-Queue. Alle Methoden nehmen `&self`,
//! der Controller kann also in einem `Arc` zwischen Threads geteilt werden.

use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use taktgeber_core::{
    ChunkSource, Encoder, Result, SessionId, SessionState, Signaling, TaktgeberError, Transport,
};
use tracing::{debug, error, info};

use crate::config::PacingConfig;
use crate::counter::PacketCounter;
use crate::pacing::{GeteilterEncoder, GeteiltesSignaling, Kommando, PacingLoop, SessionErgebnis};
use crate::telemetry::PacingStatus;

/// Steuert Wiedergaben ueber einen Transport
///
/// Sequenz und Zeitstempel laufen ueber alle Wiedergaben eines Controllers
/// weiter und werden nie zurueckgesetzt.
pub struct PacingController {
    encoder: GeteilterEncoder,
    signaling: GeteiltesSignaling,
    transport: Arc<dyn Transport>,
    config: RwLock<PacingConfig>,
    zaehler: Mutex<PacketCounter>,
    status: Arc<RwLock<PacingStatus>>,
    kommandos: Mutex<Option<Sender<Kommando>>>,
    /// Wird waehrend des Joins gehalten, damit `stop` erst nach dem Drain zurueckkehrt
    laufend: Mutex<Option<JoinHandle<SessionErgebnis>>>,
    zerstoert: AtomicBool,
}

impl PacingController {
    /// Baut die Signaling-Session auf und erstellt den Controller
    pub fn new(
        mut signaling: Box<dyn Signaling>,
        encoder: Box<dyn Encoder>,
        config: PacingConfig,
    ) -> Result<Self> {
        config.validieren()?;
        signaling.connect()?;
        let transport = signaling.transport();

        info!(
            adjust_interval = config.adjust_interval,
            retry_attempts = config.retry_attempts,
            "PacingController initialisiert"
        );

        Ok(Self {
            encoder: Arc::new(Mutex::new(encoder)),
            signaling: Arc::new(Mutex::new(signaling)),
            transport,
            config: RwLock::new(config),
            zaehler: Mutex::new(PacketCounter::new()),
            status: Arc::new(RwLock::new(PacingStatus::default())),
            kommandos: Mutex::new(None),
            laufend: Mutex::new(None),
            zerstoert: AtomicBool::new(false),
        })
    }

    /// Startet eine Wiedergabe; eine laufende wird vorher vollstaendig gestoppt
    pub fn play(&self, quelle: Box<dyn ChunkSource>) -> Result<SessionId> {
        self.lebendig()?;

        self.stop_signalisieren();
        let mut laufend = self.laufend.lock();
        if let Err(e) = self.beenden(&mut laufend) {
            error!(fehler = %e, "Vorherige Wiedergabe endete mit Fehler");
        }

        let config = self.config.read().clone();
        let (tx, rx) = bounded::<Kommando>(config.command_queue);
        let session = SessionId::new();
        let zaehler = *self.zaehler.lock();

        // Status vor dem Thread-Start setzen, damit `is_playing` sofort stimmt
        self.status.write().neue_session(session);

        let schleife = PacingLoop::new(
            session,
            quelle,
            Arc::clone(&self.encoder),
            Arc::clone(&self.signaling),
            Arc::clone(&self.transport),
            config,
            zaehler,
            rx,
            Arc::clone(&self.status),
        );

        let handle = std::thread::Builder::new()
            .name("taktgeber-pacing".to_string())
            .spawn(move || schleife.run());
        let handle = match handle {
            Ok(h) => h,
            Err(e) => {
                self.status.write().zustand = SessionState::Stopped;
                return Err(e.into());
            }
        };

        *self.kommandos.lock() = Some(tx);
        *laufend = Some(handle);
        debug!(%session, "Pacing-Thread gestartet");
        Ok(session)
    }

    /// Spielt eine Datei ueber `Encoder::encode_file` ab
    pub fn play_file(&self, pfad: impl AsRef<Path>) -> Result<SessionId> {
        self.lebendig()?;
        let quelle = self.encoder.lock().encode_file(pfad.as_ref())?;
        self.play(quelle)
    }

    /// Spielt einen beliebigen Byte-Stream ueber `Encoder::encode_io` ab
    pub fn play_io(&self, reader: Box<dyn Read + Send>) -> Result<SessionId> {
        self.lebendig()?;
        let quelle = self.encoder.lock().encode_io(reader)?;
        self.play(quelle)
    }

    /// Alias fuer [`play_io`](Self::play_io)
    pub fn play_stream(&self, reader: Box<dyn Read + Send>) -> Result<SessionId> {
        self.play_io(reader)
    }

    /// Pausiert die laufende Wiedergabe (idempotent)
    pub fn pause(&self) -> Result<()> {
        self.kommando_senden(Kommando::Pause)
    }

    /// Setzt eine pausierte Wiedergabe fort (idempotent)
    pub fn continue_playback(&self) -> Result<()> {
        self.kommando_senden(Kommando::Fortsetzen)
    }

    /// Stoppt die laufende Wiedergabe und wartet den Drain ab.
    ///
    /// Gibt einen fatalen Fehler der Session zurueck (Encoder, Quelle,
    /// Transport-Abbruch). Ohne laufende Wiedergabe ein No-op.
    pub fn stop(&self) -> Result<()> {
        self.lebendig()?;
        // Vor dem Lock senden: ein paralleles `wait` haelt `laufend` bis zum Join
        self.stop_signalisieren();
        let mut laufend = self.laufend.lock();
        self.beenden(&mut laufend)
    }

    /// Wartet bis die laufende Wiedergabe von selbst endet
    pub fn wait(&self) -> Result<()> {
        self.lebendig()?;
        let mut laufend = self.laufend.lock();
        match laufend.take() {
            Some(handle) => {
                let ergebnis = self.joinen(handle);
                self.kommandos.lock().take();
                ergebnis
            }
            None => Ok(()),
        }
    }

    /// Stoppt, baut das Signaling ab und gibt den Encoder frei.
    ///
    /// Danach liefern alle Operationen `TaktgeberError::Zerstoert`.
    pub fn destroy(&self) -> Result<()> {
        if self.zerstoert.swap(true, Ordering::AcqRel) {
            return Err(TaktgeberError::Zerstoert);
        }
        self.stop_signalisieren();
        let ergebnis = {
            let mut laufend = self.laufend.lock();
            self.beenden(&mut laufend)
        };
        self.signaling.lock().destroy();
        self.encoder.lock().destroy();
        info!("PacingController zerstoert");
        ergebnis
    }

    /// Setzt die Lautstaerke; wirkt ab dem naechsten Frame
    pub fn set_volume(&self, volume: f32) -> Result<()> {
        self.lebendig()?;
        self.encoder.lock().set_volume(volume);
        Ok(())
    }

    /// Aktuelle Lautstaerke des Encoders
    pub fn volume(&self) -> f32 {
        self.encoder.lock().volume()
    }

    /// Zustand der aktuellen bzw. letzten Wiedergabe
    pub fn state(&self) -> SessionState {
        self.status.read().zustand
    }

    /// Ob gerade Audio gesendet wird oder pausiert ist
    pub fn is_playing(&self) -> bool {
        self.state().ist_aktiv()
    }

    /// Verstrichene Stream-Zeit der aktuellen Wiedergabe in Sekunden
    pub fn stream_time(&self) -> f64 {
        self.status.read().stream_time
    }

    /// Momentaufnahme des Status
    pub fn status(&self) -> PacingStatus {
        self.status.read().clone()
    }

    /// Aktuelle Pacing-Konfiguration
    pub fn pacing_config(&self) -> PacingConfig {
        self.config.read().clone()
    }

    /// Ersetzt die Pacing-Konfiguration; gilt ab dem naechsten `play`
    pub fn set_pacing_config(&self, config: PacingConfig) -> Result<()> {
        self.lebendig()?;
        config.validieren()?;
        *self.config.write() = config;
        Ok(())
    }

    fn lebendig(&self) -> Result<()> {
        if self.zerstoert.load(Ordering::Acquire) {
            Err(TaktgeberError::Zerstoert)
        } else {
            Ok(())
        }
    }

    fn kommando_senden(&self, kommando: Kommando) -> Result<()> {
        self.lebendig()?;
        let kommandos = self.kommandos.lock();
        let Some(tx) = kommandos.as_ref() else {
            return Ok(());
        };
        match tx.try_send(kommando) {
            Ok(()) => Ok(()),
            // Thread ist bereits beendet, nichts zu steuern
            Err(TrySendError::Disconnected(_)) => Ok(()),
            Err(TrySendError::Full(_)) => Err(TaktgeberError::intern(format!(
                "Kommando-Queue voll, {:?} verworfen",
                kommando
            ))),
        }
    }

    /// Schickt Stop an den Pacing-Thread, ohne auf ihn zu warten
    fn stop_signalisieren(&self) {
        if let Some(tx) = self.kommandos.lock().take() {
            // Volle Queue: der Kanal wird durch das Drop von `tx` getrennt
            let _ = tx.try_send(Kommando::Stop);
        }
    }

    /// Signalisiert Stop, joint den Thread und uebernimmt die Zaehler
    fn beenden(&self, laufend: &mut Option<JoinHandle<SessionErgebnis>>) -> Result<()> {
        self.stop_signalisieren();
        match laufend.take() {
            Some(handle) => self.joinen(handle),
            None => Ok(()),
        }
    }

    fn joinen(&self, handle: JoinHandle<SessionErgebnis>) -> Result<()> {
        match handle.join() {
            Ok(SessionErgebnis { zaehler, ergebnis }) => {
                *self.zaehler.lock() = zaehler;
                ergebnis
            }
            Err(_) => {
                // Zaehler aus dem letzten veroeffentlichten Status wiederherstellen
                let status = self.status.read();
                *self.zaehler.lock() = PacketCounter::starting_at(status.sequence, status.timestamp);
                drop(status);
                self.status.write().zustand = SessionState::Stopped;
                Err(TaktgeberError::intern("Pacing-Thread abgestuerzt"))
            }
        }
    }
}

impl Drop for PacingController {
    fn drop(&mut self) {
        if self.zerstoert.load(Ordering::Acquire) {
            return;
        }
        let mut laufend = self.laufend.lock();
        if let Err(e) = self.beenden(&mut laufend) {
            error!(fehler = %e, "Wiedergabe beim Drop mit Fehler beendet");
        }
        debug!("PacingController gedroppt");
    }
}
