//! # taktgeber-observability
//!
//! Structured Logging via tracing-subscriber (Text oder JSON) fuer alle
//! Taktgeber-Binaries.

pub mod logging;

pub use logging::{logging_initialisieren, LogFormat};
