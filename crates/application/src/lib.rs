//! Application layer - Use cases and orchestration
//!
//! Runs chat requests against the selected engine, either as a single
//! answer or as an ordered stream of protocol events.

pub mod error;
pub mod request_context;
pub mod services;

pub use error::ApplicationError;
pub use request_context::RequestContext;
pub use services::*;
