//! Configuration for the remote engine

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`RemoteEngineConfig::base_url`]
pub const BASE_URL_ENV: &str = "OLLAMA_BASE_URL";

/// Static configuration of the Ollama-compatible backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEngineConfig {
    /// Base URL of the backend server
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model id sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Connect and per-read timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_model() -> String {
    "qwen2.5:7b".to_string()
}

const fn default_timeout_ms() -> u64 {
    60_000
}

impl Default for RemoteEngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RemoteEngineConfig {
    /// Defaults with `OLLAMA_BASE_URL` applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `OLLAMA_BASE_URL` if it is set and non-empty
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    /// Replace the base URL when `base_url` is a non-empty value
    #[must_use]
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model id
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full URL of an API endpoint, e.g. `endpoint("generate")`
    pub fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            name.trim_start_matches('/')
        )
    }
}
