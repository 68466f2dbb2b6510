//! Application services - Use case implementations

mod chat_service;
mod stream_orchestrator;

pub use chat_service::ChatService;
pub use stream_orchestrator::{EventStream, orchestrate};
