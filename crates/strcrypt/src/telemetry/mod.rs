//! Structured logging, plus optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No key material, plaintext or ciphertext** may appear in any span
//!   attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::{init_telemetry, shutdown_telemetry};
