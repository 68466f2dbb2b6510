//! API error handling
//!
//! Client mistakes map to 400, backend failures to 502 with the trace id
//! so the caller can correlate them with server logs.

use application::ApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::TraceId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{message}")]
    Upstream { trace_id: TraceId, message: String },
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Trace id of the failed request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<TraceId>,
}

impl ApiError {
    /// Map a service failure for the request identified by `trace_id`
    pub fn from_application(err: ApplicationError, trace_id: &TraceId) -> Self {
        if err.is_client_error() {
            Self::Validation(err.to_string())
        } else {
            Self::Upstream {
                trace_id: trace_id.clone(),
                message: err.to_string(),
            }
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Upstream { .. } => "upstream_failure",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let body = match self {
            Self::Validation(message) => ErrorResponse {
                error: message,
                code,
                trace_id: None,
            },
            Self::Upstream { trace_id, message } => ErrorResponse {
                error: message,
                code,
                trace_id: Some(trace_id),
            },
        };

        (status, Json(body)).into_response()
    }
}
