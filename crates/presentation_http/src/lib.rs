//! Inference gateway HTTP presentation layer
//!
//! Exposes `/health`, `/chat` and `/chat/stream` and encodes protocol
//! events as server-sent events.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod sse;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use middleware::{TRACE_ID_HEADER, TraceIdLayer, ValidatedJson};
pub use routes::create_router;
pub use state::AppState;
