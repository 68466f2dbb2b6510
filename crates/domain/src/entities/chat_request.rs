//! Chat request and response envelopes

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::chat_message::ChatMessage;
use crate::{errors::DomainError, value_objects::Provider, value_objects::TraceId};

const fn default_temperature() -> f32 {
    0.7
}

const fn default_top_p() -> f32 {
    0.9
}

const fn default_max_tokens() -> u32 {
    256
}

/// Incoming chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    /// Client session id, echoed back in the response
    #[serde(default)]
    pub session_id: Option<String>,

    /// Conversation so far, oldest first
    #[validate(length(min = 1, message = "must contain at least one message"))]
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling probability mass
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Upper bound on generated tokens
    #[serde(default = "default_max_tokens")]
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub max_tokens: u32,

    /// Backend engine to use
    #[serde(default)]
    pub provider: Provider,
}

impl ChatRequest {
    /// Create a request with default sampling settings and the mock provider
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            session_id: None,
            messages,
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            provider: Provider::default(),
        }
    }

    /// Set the provider
    #[must_use]
    pub const fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = provider;
        self
    }

    /// Set the token budget
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the session id
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Validate the request invariants (non-empty messages, positive token budget)
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate().map_err(DomainError::from)
    }
}

/// Response for a completed, non-streaming chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Trace id of the request that produced this answer
    pub trace_id: TraceId,
    /// Session id copied from the request
    pub session_id: Option<String>,
    /// Generated answer
    pub answer: String,
}
