//! Application configuration
//!
//! Layered, lowest precedence first:
//! 1. built-in defaults
//! 2. optional `config.toml` in the working directory
//! 3. `GATEWAY_` environment variables, `__` between nested keys
//!    (e.g. `GATEWAY_SERVER__PORT=8080`)
//! 4. `OLLAMA_BASE_URL` for the remote engine endpoint

mod server;

use ai_core::RemoteEngineConfig;
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use server::ServerConfig;

use crate::telemetry::TelemetryConfig;

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "GATEWAY";

/// Base name of the optional configuration file
pub const CONFIG_FILE: &str = "config";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote engine configuration
    #[serde(default)]
    pub remote: RemoteEngineConfig,

    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Environment source for `GATEWAY_*` variables
fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(env_source());

        let config = Self::from_builder(builder)?.with_env_overrides();
        debug!(
            bind = %config.server.bind_address(),
            remote = %config.remote.base_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Deserialize whatever sources `builder` holds, filling gaps with defaults
    pub fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// Apply `OLLAMA_BASE_URL` on top of the loaded values
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.remote = self.remote.with_env_overrides();
        self
    }
}
