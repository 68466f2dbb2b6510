//! Trace identifier correlating logs, headers and stream events of one request

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// Per-request correlation identifier
///
/// Either propagated from the caller or freshly generated. Propagated values
/// must be printable ASCII without spaces so they can be echoed in a header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Longest accepted propagated trace id
    pub const MAX_LEN: usize = 128;

    /// Generate a new time-ordered trace id
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Accept a caller-supplied trace id
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTraceId("empty".to_string()));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(DomainError::InvalidTraceId(format!(
                "longer than {} characters",
                Self::MAX_LEN
            )));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(DomainError::InvalidTraceId(
                "contains non-printable characters".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TraceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
