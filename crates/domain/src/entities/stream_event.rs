//! Events of the incremental push protocol
//!
//! A stream always has the shape `meta token* (usage done | error)`. The
//! terminal event is either `done` or `error`; nothing follows it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::value_objects::TraceId;

/// Payload of the `done` event
pub const DONE_SENTINEL: &str = "[DONE]";

/// Kind tag of a stream event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Meta,
    Token,
    Usage,
    Done,
    Error,
}

impl EventKind {
    /// Wire name of the kind
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Meta => "meta",
            Self::Token => "token",
            Self::Usage => "usage",
            Self::Done => "done",
            Self::Error => "error",
        }
    }

    /// Whether an event of this kind ends the stream
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First event of every stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMeta {
    pub trace_id: TraceId,
    pub provider: String,
}

/// Latency and token accounting emitted before `done`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    pub trace_id: TraceId,
    pub provider: String,
    pub model: Option<String>,
    pub latency_ms: u64,
    /// Number of `token` events emitted
    pub token_events: u64,
}

/// Terminal failure report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFailure {
    pub trace_id: TraceId,
    pub provider: String,
    pub model: Option<String>,
    /// Latency up to the failure
    pub latency_ms: u64,
    pub error: String,
}

/// Serialized body of an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// Sent verbatim
    Text(String),
    /// Sent as JSON
    Json(serde_json::Value),
}

impl EventPayload {
    /// Render the payload as it appears on the wire (before line splitting)
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Json(value) => value.to_string(),
        }
    }
}

/// One unit of the push protocol
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Meta(StreamMeta),
    /// Raw chunk produced by the engine
    Token(String),
    Usage(UsageReport),
    Done,
    Error(StreamFailure),
}

impl StreamEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Meta(_) => EventKind::Meta,
            Self::Token(_) => EventKind::Token,
            Self::Usage(_) => EventKind::Usage,
            Self::Done => EventKind::Done,
            Self::Error(_) => EventKind::Error,
        }
    }

    pub const fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }

    /// Build the payload for this event
    pub fn payload(&self) -> EventPayload {
        match self {
            Self::Meta(meta) => EventPayload::Json(json!({
                "trace_id": meta.trace_id,
                "provider": meta.provider,
            })),
            Self::Token(chunk) => EventPayload::Text(chunk.clone()),
            Self::Usage(usage) => EventPayload::Json(json!({
                "trace_id": usage.trace_id,
                "provider": usage.provider,
                "model": usage.model,
                "latency_ms": usage.latency_ms,
                "token_events": usage.token_events,
            })),
            Self::Done => EventPayload::Text(DONE_SENTINEL.to_string()),
            Self::Error(failure) => EventPayload::Json(json!({
                "trace_id": failure.trace_id,
                "provider": failure.provider,
                "model": failure.model,
                "latency_ms": failure.latency_ms,
                "error": failure.error,
            })),
        }
    }
}
