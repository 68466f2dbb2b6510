//! Chat service - single answers and event streams

use ai_core::{EngineSelector, GenerationRequest};
use domain::{ChatRequest, ChatResponse};
use tracing::{info, instrument, warn};

use super::stream_orchestrator::{EventStream, orchestrate};
use crate::{error::ApplicationError, request_context::RequestContext};

/// Service for handling chat requests
#[derive(Debug, Clone)]
pub struct ChatService {
    selector: EngineSelector,
}

impl ChatService {
    /// Create a new chat service
    pub const fn new(selector: EngineSelector) -> Self {
        Self { selector }
    }

    /// Generate a complete answer
    #[instrument(skip_all, fields(trace_id = %ctx.trace_id(), provider = %request.provider))]
    pub async fn chat(
        &self,
        ctx: &RequestContext,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ApplicationError> {
        request.check()?;

        let engine = self
            .selector
            .select_provider(request.provider)
            .map_err(|e| ApplicationError::engine(request.provider.as_str(), e))?;

        let answer = match engine.generate(&GenerationRequest::from(request)).await {
            Ok(answer) => answer,
            Err(e) => {
                let err = ApplicationError::engine(engine.name(), e);
                warn!(
                    latency_ms = ctx.latency_ms(),
                    error = %err,
                    "Chat generation failed"
                );
                return Err(err);
            },
        };

        info!(
            engine = engine.name(),
            latency_ms = ctx.latency_ms(),
            answer_chars = answer.chars().count(),
            "Chat answer generated"
        );

        Ok(ChatResponse {
            trace_id: ctx.trace_id().clone(),
            session_id: request.session_id.clone(),
            answer,
        })
    }

    /// Validate the request and build its event stream
    ///
    /// Validation failures are returned before any event is produced;
    /// everything after that is reported inside the stream.
    pub fn chat_stream(
        &self,
        ctx: RequestContext,
        request: &ChatRequest,
    ) -> Result<EventStream, ApplicationError> {
        request.check()?;

        info!(
            trace_id = %ctx.trace_id(),
            provider = %request.provider,
            messages = request.messages.len(),
            "Starting chat stream"
        );

        let selection = self.selector.select_provider(request.provider);
        Ok(orchestrate(
            selection,
            request.provider,
            ctx,
            GenerationRequest::from(request),
        ))
    }
}
