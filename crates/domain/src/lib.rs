//! Domain layer for the inference gateway
//!
//! Contains the chat message model, provider identifiers, trace ids and the
//! incremental stream event protocol. No I/O happens in this crate.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::{DomainError, describe_validation_errors};
pub use value_objects::*;
