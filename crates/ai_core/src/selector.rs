//! Engine selection by provider id
//!
//! Maps the provider named in a request to a concrete engine. The mock
//! engine is shared; remote engines are built per request from static
//! configuration, so concurrent requests never share mutable state.

use std::sync::Arc;

use domain::Provider;
use tracing::debug;

use crate::{
    config::RemoteEngineConfig,
    error::EngineError,
    mock::MockEngine,
    ollama::OllamaEngine,
    ports::Engine,
};

/// Resolves provider ids to engines
#[derive(Debug, Clone)]
pub struct EngineSelector {
    remote: RemoteEngineConfig,
    mock: Arc<MockEngine>,
}

impl Default for EngineSelector {
    fn default() -> Self {
        Self::new(RemoteEngineConfig::from_env())
    }
}

impl EngineSelector {
    /// Create a selector using `remote` for the remote provider
    pub fn new(remote: RemoteEngineConfig) -> Self {
        Self {
            remote,
            mock: Arc::new(MockEngine::new()),
        }
    }

    /// Replace the shared mock engine
    #[must_use]
    pub fn with_mock(mut self, mock: MockEngine) -> Self {
        self.mock = Arc::new(mock);
        self
    }

    /// Select by raw id; unknown or missing ids fall back to the mock engine
    pub fn select(&self, provider_id: Option<&str>) -> Result<Arc<dyn Engine>, EngineError> {
        self.select_provider(Provider::from_id(provider_id))
    }

    /// Select by parsed provider
    pub fn select_provider(&self, provider: Provider) -> Result<Arc<dyn Engine>, EngineError> {
        debug!(provider = %provider, "Selecting engine");
        match provider {
            Provider::Mock => Ok(self.mock.clone()),
            Provider::Remote => Ok(Arc::new(OllamaEngine::new(self.remote.clone())?)),
        }
    }
}
