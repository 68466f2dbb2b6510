//! HTTP middleware components
//!
//! Trace id propagation and validated request extraction.

pub mod trace_id;
pub mod validation;

pub use trace_id::{TRACE_ID_HEADER, TraceIdLayer, TraceIdService};
pub use validation::ValidatedJson;
