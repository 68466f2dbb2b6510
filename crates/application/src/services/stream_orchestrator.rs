//! Stream orchestration
//!
//! Wraps an engine's chunk stream in the push protocol:
//! `meta`, one `token` per chunk, then `usage` and `done`, or a single
//! `error` if anything fails. The returned stream is lazy; dropping it stops
//! the engine stream and releases its backend connection.

use std::{pin::Pin, sync::Arc};

use ai_core::{Engine, EngineError, GenerationRequest};
use domain::{Provider, StreamEvent, StreamFailure, StreamMeta, TraceId, UsageReport};
use futures::{Stream, StreamExt};
use tracing::{info, warn};

use crate::{error::ApplicationError, request_context::RequestContext};

/// Ordered protocol events of one request
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Fields shared by every event of one stream
struct StreamLabels {
    ctx: RequestContext,
    provider: String,
    model: Option<String>,
}

impl StreamLabels {
    fn trace_id(&self) -> &TraceId {
        self.ctx.trace_id()
    }

    fn latency_ms(&self) -> u64 {
        self.ctx.latency_ms()
    }

    fn meta(&self) -> StreamEvent {
        StreamEvent::Meta(StreamMeta {
            trace_id: self.trace_id().clone(),
            provider: self.provider.clone(),
        })
    }

    fn usage(&self, token_events: u64) -> StreamEvent {
        let latency_ms = self.latency_ms();
        info!(
            trace_id = %self.trace_id(),
            provider = %self.provider,
            latency_ms,
            token_events,
            "Stream completed"
        );
        StreamEvent::Usage(UsageReport {
            trace_id: self.trace_id().clone(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            latency_ms,
            token_events,
        })
    }

    fn failure(&self, source: EngineError, token_events: u64) -> StreamEvent {
        let latency_ms = self.latency_ms();
        let error = ApplicationError::engine(self.provider.clone(), source).to_string();
        warn!(
            trace_id = %self.trace_id(),
            provider = %self.provider,
            latency_ms,
            token_events,
            error = %error,
            "Stream failed"
        );
        StreamEvent::Error(StreamFailure {
            trace_id: self.trace_id().clone(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            latency_ms,
            error,
        })
    }
}

/// Logs when the consumer drops the stream before a terminal event
struct DisconnectGuard {
    trace_id: TraceId,
    finished: bool,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        if !self.finished {
            info!(trace_id = %self.trace_id, "Client disconnected, stream cancelled");
        }
    }
}

/// Build the event stream for one request
///
/// `selection` is the outcome of engine selection for `provider`; a failed
/// selection is reported as the `error` event following `meta`.
pub fn orchestrate(
    selection: Result<Arc<dyn Engine>, EngineError>,
    provider: Provider,
    ctx: RequestContext,
    request: GenerationRequest,
) -> EventStream {
    let (name, model) = match &selection {
        Ok(engine) => (
            engine.name().to_string(),
            engine.model().map(str::to_string),
        ),
        Err(_) => (provider.as_str().to_string(), None),
    };

    Box::pin(async_stream::stream! {
        let labels = StreamLabels {
            ctx,
            provider: name,
            model,
        };
        let mut guard = DisconnectGuard {
            trace_id: labels.trace_id().clone(),
            finished: false,
        };

        yield labels.meta();

        let engine = match selection {
            Ok(engine) => engine,
            Err(err) => {
                guard.finished = true;
                yield labels.failure(err, 0);
                return;
            },
        };

        let mut chunks = match engine.stream(&request).await {
            Ok(chunks) => chunks,
            Err(err) => {
                guard.finished = true;
                yield labels.failure(err, 0);
                return;
            },
        };

        let mut token_events: u64 = 0;
        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => {
                    token_events += 1;
                    yield StreamEvent::Token(chunk);
                },
                Err(err) => {
                    guard.finished = true;
                    yield labels.failure(err, token_events);
                    return;
                },
            }
        }

        guard.finished = true;
        yield labels.usage(token_events);
        yield StreamEvent::Done;
    })
}
