//! Port definitions for generation engines
//!
//! Defines the trait that engine adapters implement.

use std::pin::Pin;

use async_trait::async_trait;
use domain::{ChatMessage, ChatRequest};
use futures::Stream;

use crate::error::EngineError;

/// Parameters of one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Messages in conversation order
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Create a request with default sampling settings
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 256,
        }
    }

    /// Create a single-turn user request
    pub fn simple(user_message: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(user_message)])
    }

    /// Set temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set top-p
    #[must_use]
    pub const fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Set the token budget
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl From<&ChatRequest> for GenerationRequest {
    fn from(request: &ChatRequest) -> Self {
        Self {
            messages: request.messages.clone(),
            temperature: request.temperature,
            top_p: request.top_p,
            max_tokens: request.max_tokens,
        }
    }
}

/// Lazy, finite sequence of text chunks
///
/// An `Err` item ends the sequence; chunks yielded before it stay delivered.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, EngineError>> + Send>>;

/// Port for generation engines
///
/// Implementations hold only static configuration and may serve concurrent
/// requests.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Provider name reported in stream events and errors
    fn name(&self) -> &str;

    /// Backend model id, if the engine has one
    fn model(&self) -> Option<&str> {
        None
    }

    /// Generate a complete answer
    async fn generate(&self, request: &GenerationRequest) -> Result<String, EngineError>;

    /// Generate an answer incrementally
    ///
    /// Failures before the first chunk may be returned directly or as the
    /// first item of the stream.
    async fn stream(&self, request: &GenerationRequest) -> Result<ChunkStream, EngineError>;
}
