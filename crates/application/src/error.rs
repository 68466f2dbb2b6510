//! Application-level errors

use ai_core::EngineError;
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request rejected before reaching an engine
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Engine failed to produce an answer
    #[error("{provider} engine failed: {source}")]
    Engine {
        provider: String,
        #[source]
        source: EngineError,
    },
}

impl ApplicationError {
    pub fn engine(provider: impl Into<String>, source: EngineError) -> Self {
        Self::Engine {
            provider: provider.into(),
            source,
        }
    }

    /// Whether the client sent an invalid request
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}
