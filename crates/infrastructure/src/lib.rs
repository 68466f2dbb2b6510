//! Infrastructure layer - Configuration and telemetry
//!
//! Loads the layered application configuration and installs the global
//! tracing subscriber.

pub mod config;
pub mod telemetry;

pub use config::{AppConfig, ServerConfig};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_telemetry};
