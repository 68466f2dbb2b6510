//! Domain entities - Request/response envelopes and stream events

mod chat_message;
mod chat_request;
mod stream_event;

pub use chat_message::{ChatMessage, MessageRole};
pub use chat_request::{ChatRequest, ChatResponse};
pub use stream_event::{
    DONE_SENTINEL, EventKind, EventPayload, StreamEvent, StreamFailure, StreamMeta, UsageReport,
};
