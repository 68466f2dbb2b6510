//! Value Objects - Immutable, identity-less domain primitives

mod provider;
mod trace_id;

pub use provider::Provider;
pub use trace_id::TraceId;
