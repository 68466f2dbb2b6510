//! Request context for propagating trace metadata
//!
//! Created by the HTTP layer once the trace id is known and passed to the
//! services, which attach it to every event and log line of the request.
//!
//! # Examples
//!
//! ```
//! use application::RequestContext;
//! use domain::TraceId;
//!
//! let ctx = RequestContext::new(TraceId::parse("abc-123").unwrap());
//! assert_eq!(ctx.trace_id().as_str(), "abc-123");
//! ```

use std::time::{Duration, Instant};

use domain::TraceId;

/// Context for a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    trace_id: TraceId,
    received_at: Instant,
}

impl RequestContext {
    /// Create a context for the given trace id, received now
    #[must_use]
    pub fn new(trace_id: TraceId) -> Self {
        Self {
            trace_id,
            received_at: Instant::now(),
        }
    }

    /// Create a context with a freshly generated trace id
    #[must_use]
    pub fn generated() -> Self {
        Self::new(TraceId::generate())
    }

    pub const fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Time since the request was received
    pub fn elapsed(&self) -> Duration {
        self.received_at.elapsed()
    }

    /// Milliseconds since the request was received, saturating
    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
