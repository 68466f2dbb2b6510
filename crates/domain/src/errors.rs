//! Domain-level errors

use thiserror::Error;
use validator::ValidationErrors;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// Provider identifier not recognised
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Trace id is empty, too long or contains non-printable characters
    #[error("Invalid trace id: {0}")]
    InvalidTraceId(String),
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationError(describe_validation_errors(&errors))
    }
}

/// Render validator errors as `field: message` pairs joined by `; `
///
/// Fields are sorted so the output is stable across runs.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut described: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error
                        .message
                        .as_ref()
                        .map_or_else(|| error.code.to_string(), ToString::to_string)
                )
            })
        })
        .collect();
    described.sort();
    described.join("; ")
}
