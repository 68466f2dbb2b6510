//! Telemetry infrastructure
//!
//! Structured logging through a `tracing` subscriber, in text or JSON form.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
