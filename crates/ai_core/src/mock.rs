//! Deterministic echo engine
//!
//! Answers with the last user message and streams that answer one character
//! at a time. Used for local development and tests; never fails.

use std::time::Duration;

use async_trait::async_trait;
use domain::{ChatMessage, MessageRole};
use tracing::debug;

use crate::{
    error::EngineError,
    ports::{ChunkStream, Engine, GenerationRequest},
};

/// Name reported by the mock engine
pub const MOCK_ENGINE_NAME: &str = "mock";

/// Delay between streamed characters
pub const DEFAULT_PACING: Duration = Duration::from_millis(10);

/// Longest echoed prefix of the user message, in characters
const MAX_ECHO_CHARS: usize = 200;

const REPLY_PREFIX: &str = "[mock] you said: ";
const STREAM_PREFIX: &str = "[mock-stream] ";

/// Echo engine with configurable streaming pace
#[derive(Debug, Clone)]
pub struct MockEngine {
    pacing: Duration,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub const fn new() -> Self {
        Self {
            pacing: DEFAULT_PACING,
        }
    }

    /// Use a different delay between streamed characters
    pub const fn with_pacing(pacing: Duration) -> Self {
        Self { pacing }
    }

    pub const fn pacing(&self) -> Duration {
        self.pacing
    }

    /// The non-streaming answer for a conversation
    pub fn reply(messages: &[ChatMessage]) -> String {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map_or("", |m| m.content.as_str());
        let echoed: String = last_user.chars().take(MAX_ECHO_CHARS).collect();
        format!("{REPLY_PREFIX}{echoed}")
    }
}

#[async_trait]
impl Engine for MockEngine {
    fn name(&self) -> &str {
        MOCK_ENGINE_NAME
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, EngineError> {
        Ok(Self::reply(&request.messages))
    }

    async fn stream(&self, request: &GenerationRequest) -> Result<ChunkStream, EngineError> {
        let text = format!("{STREAM_PREFIX}{}", Self::reply(&request.messages));
        let pacing = self.pacing;
        debug!(chars = text.chars().count(), "Streaming mock reply");

        let chunks = async_stream::stream! {
            for (index, ch) in text.chars().enumerate() {
                if index > 0 && !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                }
                yield Ok::<_, EngineError>(ch.to_string());
            }
        };

        Ok(Box::pin(chunks))
    }
}
