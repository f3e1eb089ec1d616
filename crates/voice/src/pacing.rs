//! Pacing-Loop
//!
//! Laeuft auf einem eigenen Thread und besitzt die Chunk-Quelle exklusiv.
//! Steuerkommandos kommen ueber einen crossbeam-Kanal; der Status wird nur
//! von hier geschrieben.
//!
//! ## Ablauf pro Iteration
//!
//! ```text
//! Messfenster? -> Kommandos -> Stop? -> Chunk lesen -> kodieren
//!     -> Zaehler vorruecken -> senden -> Laenge korrigieren
//!     -> Pause-Block -> Takt-Schlaf
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use parking_lot::{Mutex, RwLock};
use taktgeber_core::{
    Chunk, ChunkSource, Encoder, Result, SessionId, SessionState, Signaling, TaktgeberError,
    Transport,
};
use tracing::{debug, error, info, info_span, trace, warn};

use crate::config::PacingConfig;
use crate::counter::PacketCounter;
use crate::telemetry::PacingStatus;
use crate::timing::{FrameTimer, NOMINAL_FRAME};

/// Kommandos an den Pacing-Thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kommando {
    Pause,
    Fortsetzen,
    Stop,
}

/// Rueckgabe des Pacing-Threads beim Join
#[derive(Debug)]
pub struct SessionErgebnis {
    /// Zaehlerstand nach dem letzten gesendeten Frame
    pub zaehler: PacketCounter,
    /// Ok bei regulaerem Ende (Quelle erschoepft, Stop, Retries erschoepft)
    pub ergebnis: Result<()>,
}

/// Gemeinsam genutzter Encoder (Lautstaerke wird von aussen gesetzt)
pub type GeteilterEncoder = Arc<Mutex<Box<dyn Encoder>>>;

/// Gemeinsam genutzter Signaling-Kanal
pub type GeteiltesSignaling = Arc<Mutex<Box<dyn Signaling>>>;

/// Zustand einer laufenden Wiedergabe
pub struct PacingLoop {
    session: SessionId,
    quelle: Box<dyn ChunkSource>,
    encoder: GeteilterEncoder,
    signaling: GeteiltesSignaling,
    transport: Arc<dyn Transport>,
    config: PacingConfig,
    zaehler: PacketCounter,
    kommandos: Receiver<Kommando>,
    status: Arc<RwLock<PacingStatus>>,

    timer: FrameTimer,
    retry_budget: u32,
    gesendet: u64,
    stream_time: f64,
    underruns: u64,
    transport_fehler: u64,
    transport_fehler_in_folge: u32,
    letzter_versand: Option<Instant>,
    pausiert: bool,
    stop_angefordert: bool,
}

impl PacingLoop {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: SessionId,
        quelle: Box<dyn ChunkSource>,
        encoder: GeteilterEncoder,
        signaling: GeteiltesSignaling,
        transport: Arc<dyn Transport>,
        config: PacingConfig,
        zaehler: PacketCounter,
        kommandos: Receiver<Kommando>,
        status: Arc<RwLock<PacingStatus>>,
    ) -> Self {
        let timer = FrameTimer::new(&config);
        let retry_budget = config.retry_attempts;
        Self {
            session,
            quelle,
            encoder,
            signaling,
            transport,
            config,
            zaehler,
            kommandos,
            status,
            timer,
            retry_budget,
            gesendet: 0,
            stream_time: 0.0,
            underruns: 0,
            transport_fehler: 0,
            transport_fehler_in_folge: 0,
            letzter_versand: None,
            pausiert: false,
            stop_angefordert: false,
        }
    }

    /// Fuehrt die Wiedergabe bis zum Ende aus und raeumt danach auf
    pub fn run(mut self) -> SessionErgebnis {
        let span = info_span!("pacing", session = %self.session);
        let _guard = span.enter();

        self.status.write().neue_session(self.session);
        info!(
            sequence = self.zaehler.sequence(),
            timestamp = self.zaehler.timestamp(),
            "Wiedergabe gestartet"
        );

        if let Err(e) = self.signaling.lock().set_speaking(true) {
            warn!(fehler = %e, "Speaking-Signal (an) fehlgeschlagen");
        }

        let ergebnis = self.schleife();
        if let Err(e) = &ergebnis {
            error!(fehler = %e, "Wiedergabe abgebrochen");
        }

        self.drain();

        SessionErgebnis {
            zaehler: self.zaehler,
            ergebnis,
        }
    }

    fn schleife(&mut self) -> Result<()> {
        loop {
            self.timer.sample_point(self.gesendet);

            self.kommandos_abholen();
            if self.stop_angefordert {
                debug!("Stop angefordert");
                return Ok(());
            }

            let daten = match self.quelle.read_chunk()? {
                Chunk::Full(daten) => {
                    self.retry_budget = self.config.retry_attempts;
                    daten
                }
                Chunk::End => {
                    debug!(frames = self.gesendet, "Quelle erschoepft");
                    return Ok(());
                }
                Chunk::Short(rest) => {
                    self.underruns += 1;
                    self.status.write().underruns = self.underruns;
                    if self.retry_budget == 0 {
                        info!(
                            bytes = rest.len(),
                            underruns = self.underruns,
                            "Keine Daten mehr nach Wiederholungen, Wiedergabe endet"
                        );
                        return Ok(());
                    }
                    self.retry_budget -= 1;
                    trace!(
                        bytes = rest.len(),
                        verbleibend = self.retry_budget,
                        "Kurzer Chunk, erneuter Leseversuch"
                    );
                    continue;
                }
            };

            // Zaehler erst nach erfolgreichem Kodieren vorruecken, ein
            // Encoder-Fehler verbraucht keine Sequenznummer
            let frame = self.encoder.lock().encode(&daten)?;
            let (sequence, timestamp) = self.zaehler.advance();
            let versand = self.senden(&frame, sequence, timestamp);
            // Stream-Zeit mit der Laenge zum Sendezeitpunkt, nie rueckwaerts
            self.stream_time = self
                .stream_time
                .max(self.gesendet as f64 * self.timer.length_ms() / 1000.0);
            versand?;

            if let Some(neu) = self.timer.correct(Instant::now()) {
                debug!(laenge_ms = neu, frame = self.gesendet, "Neue Frame-Laenge");
            }
            self.status_aktualisieren();

            self.kommandos_abholen();
            self.pause_block();
            if self.stop_angefordert {
                continue;
            }
            self.takt_schlafen(self.timer.sleep_duration());
        }
    }

    fn senden(&mut self, frame: &[u8], sequence: u16, timestamp: u32) -> Result<()> {
        let ergebnis = self.transport.send_audio(frame, sequence, timestamp);
        self.letzter_versand = Some(Instant::now());
        self.gesendet += 1;

        match ergebnis {
            Ok(()) => {
                self.transport_fehler_in_folge = 0;
                trace!(sequence, timestamp, bytes = frame.len(), "Frame gesendet");
                Ok(())
            }
            Err(e) => {
                self.transport_fehler += 1;
                self.transport_fehler_in_folge += 1;
                warn!(
                    fehler = %e,
                    sequence,
                    in_folge = self.transport_fehler_in_folge,
                    "Frame konnte nicht gesendet werden"
                );
                match self.config.transport_fehler_limit {
                    Some(limit) if self.transport_fehler_in_folge >= limit => {
                        Err(TaktgeberError::TransportAbbruch(limit))
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    fn status_aktualisieren(&self) {
        let laenge = self.timer.length_ms();
        let mut status = self.status.write();
        status.frames_gesendet = self.gesendet;
        status.sequence = self.zaehler.sequence();
        status.timestamp = self.zaehler.timestamp();
        status.frame_length_ms = laenge;
        status.stream_time = self.stream_time;
        status.transport_fehler = self.transport_fehler;
    }

    fn kommando(&mut self, kommando: Kommando) {
        match kommando {
            Kommando::Pause => {
                if !self.pausiert {
                    debug!("Pausiert");
                }
                self.pausiert = true;
            }
            Kommando::Fortsetzen => {
                if self.pausiert {
                    debug!("Fortgesetzt");
                }
                self.pausiert = false;
            }
            Kommando::Stop => {
                self.stop_angefordert = true;
                self.pausiert = false;
            }
        }
    }

    /// Verarbeitet alle anstehenden Kommandos ohne zu blockieren
    fn kommandos_abholen(&mut self) {
        loop {
            match self.kommandos.try_recv() {
                Ok(k) => self.kommando(k),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.stop_angefordert = true;
                    break;
                }
            }
        }
    }

    /// Blockiert solange pausiert ist; Zaehler bleiben unveraendert
    fn pause_block(&mut self) {
        if !self.pausiert || self.stop_angefordert {
            return;
        }
        self.status.write().zustand = SessionState::Paused;

        while self.pausiert && !self.stop_angefordert {
            match self.kommandos.recv() {
                Ok(k) => self.kommando(k),
                Err(_) => self.stop_angefordert = true,
            }
        }

        if !self.stop_angefordert {
            self.status.write().zustand = SessionState::Playing;
        }
    }

    /// Wartet bis zum naechsten Takt, reagiert dabei sofort auf Kommandos
    fn takt_schlafen(&mut self, dauer: Duration) {
        let frist = Instant::now() + dauer;
        loop {
            let rest = frist.saturating_duration_since(Instant::now());
            if rest.is_zero() {
                return;
            }
            match self.kommandos.recv_timeout(rest) {
                Ok(k) => {
                    self.kommando(k);
                    if self.stop_angefordert {
                        return;
                    }
                    self.pause_block();
                }
                Err(RecvTimeoutError::Timeout) => return,
                Err(RecvTimeoutError::Disconnected) => {
                    self.stop_angefordert = true;
                    return;
                }
            }
        }
    }

    /// Quelle freigeben, letzten Frame abwarten, Speaking-Signal loeschen
    fn drain(&mut self) {
        self.status.write().zustand = SessionState::Stopping;
        self.quelle.close();

        if let Some(letzter) = self.letzter_versand {
            let rest = (letzter + NOMINAL_FRAME).saturating_duration_since(Instant::now());
            if !rest.is_zero() {
                std::thread::sleep(rest);
            }
        }

        if let Err(e) = self.signaling.lock().set_speaking(false) {
            warn!(fehler = %e, "Speaking-Signal (aus) fehlgeschlagen");
        }

        self.status_aktualisieren();
        self.status.write().zustand = SessionState::Stopped;
        debug!(
            frames = self.gesendet,
            underruns = self.underruns,
            transport_fehler = self.transport_fehler,
            "Aufgeraeumt"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::collections::VecDeque;
    use std::io::Read;
    use std::path::Path;

    struct ListenQuelle(VecDeque<Chunk>);

    impl ChunkSource for ListenQuelle {
        fn read_chunk(&mut self) -> std::io::Result<Chunk> {
            Ok(self.0.pop_front().unwrap_or(Chunk::End))
        }
    }

    struct Durchreicher;

    impl Encoder for Durchreicher {
        fn encode(&mut self, chunk: &[u8]) -> Result<Vec<u8>> {
            Ok(chunk.to_vec())
        }
        fn encode_file(&self, _path: &Path) -> Result<Box<dyn ChunkSource>> {
            Err(TaktgeberError::intern("nicht unterstuetzt"))
        }
        fn encode_io(&self, _reader: Box<dyn Read + Send>) -> Result<Box<dyn ChunkSource>> {
            Err(TaktgeberError::intern("nicht unterstuetzt"))
        }
        fn volume(&self) -> f32 {
            1.0
        }
        fn set_volume(&mut self, _volume: f32) {}
    }

    #[derive(Default)]
    struct Zaehlender(Mutex<Vec<(u16, u32)>>);

    impl Transport for Zaehlender {
        fn send_audio(&self, _frame: &[u8], sequence: u16, timestamp: u32) -> Result<()> {
            self.0.lock().push((sequence, timestamp));
            Ok(())
        }
    }

    struct Stumm(Arc<Zaehlender>);

    impl Signaling for Stumm {
        fn connect(&mut self) -> Result<()> {
            Ok(())
        }
        fn set_speaking(&mut self, _speaking: bool) -> Result<()> {
            Ok(())
        }
        fn transport(&self) -> Arc<dyn Transport> {
            self.0.clone()
        }
        fn destroy(&mut self) {}
    }

    fn schleife_bauen(chunks: Vec<Chunk>, zaehler: PacketCounter) -> (PacingLoop, Arc<Zaehlender>) {
        let transport = Arc::new(Zaehlender::default());
        let (_tx, rx) = bounded(4);
        let schleife = PacingLoop::new(
            SessionId::new(),
            Box::new(ListenQuelle(chunks.into())),
            Arc::new(Mutex::new(Box::new(Durchreicher))),
            Arc::new(Mutex::new(Box::new(Stumm(transport.clone())))),
            transport.clone(),
            PacingConfig::default(),
            zaehler,
            rx,
            Arc::new(RwLock::new(PacingStatus::default())),
        );
        (schleife, transport)
    }

    #[test]
    fn getrennter_kanal_stoppt_sofort() {
        let (schleife, transport) =
            schleife_bauen(vec![Chunk::Full(vec![0; 8])], PacketCounter::new());
        let ergebnis = schleife.run();
        assert!(ergebnis.ergebnis.is_ok());
        assert!(transport.0.lock().is_empty());
    }

    #[test]
    fn kommandos_sind_idempotent() {
        let (mut schleife, _) = schleife_bauen(vec![], PacketCounter::new());
        schleife.kommando(Kommando::Fortsetzen);
        assert!(!schleife.pausiert);
        schleife.kommando(Kommando::Pause);
        schleife.kommando(Kommando::Pause);
        assert!(schleife.pausiert);
        schleife.kommando(Kommando::Stop);
        assert!(!schleife.pausiert);
        assert!(schleife.stop_angefordert);
    }

    #[test]
    fn zaehler_wird_zurueckgegeben() {
        let transport = Arc::new(Zaehlender::default());
        let (tx, rx) = bounded(4);
        let schleife = PacingLoop::new(
            SessionId::new(),
            Box::new(ListenQuelle(
                vec![Chunk::Full(vec![1; 4]), Chunk::Full(vec![2; 4])].into(),
            )),
            Arc::new(Mutex::new(Box::new(Durchreicher))),
            Arc::new(Mutex::new(Box::new(Stumm(transport.clone())))),
            transport.clone(),
            PacingConfig::default(),
            PacketCounter::starting_at(7, 7 * 960),
            rx,
            Arc::new(RwLock::new(PacingStatus::default())),
        );
        let ergebnis = schleife.run();
        drop(tx);
        assert!(ergebnis.ergebnis.is_ok());
        assert_eq!(ergebnis.zaehler.sequence(), 9);
        assert_eq!(*transport.0.lock(), vec![(8, 7680), (9, 8640)]);
    }
}
