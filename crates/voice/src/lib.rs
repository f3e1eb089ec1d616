//! taktgeber-voice – Echtzeit-Pacing fuer Audio-Streams
//!
//! Liest Rohdaten-Chunks, kodiert sie, versieht sie mit Sequenz und
//! Zeitstempel und sendet sie im 20-ms-Takt ueber einen Best-Effort-Transport.
//!
//! ## Module
//! - [`controller`] – `PacingController`: oeffentliche API einer Wiedergabe
//! - [`pacing`] – Pacing-Loop auf eigenem Thread
//! - [`counter`] – Sequenz-/Zeitstempel-Zaehler mit Wrap-Policy
//! - [`timing`] – Adaptive Frame-Laenge
//! - [`telemetry`] – Beobachtbarer Session-Status
//! - [`config`] – Pacing-Konfiguration
//! - [`udp`] – UDP-Transport mit Send-Queue
//! - [`signaling`] – Kanal-basierter Signaling-Adapter

pub mod config;
pub mod controller;
pub mod counter;
pub mod pacing;
pub mod signaling;
pub mod telemetry;
pub mod timing;
pub mod udp;

pub use config::PacingConfig;
pub use controller::PacingController;
pub use counter::PacketCounter;
pub use signaling::KanalSignaling;
pub use telemetry::PacingStatus;
pub use udp::UdpTransport;
