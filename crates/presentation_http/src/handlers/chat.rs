//! Chat handlers

use std::convert::Infallible;

use application::RequestContext;
use axum::{
    Extension, Json,
    body::Body,
    extract::State,
    http::{
        HeaderValue,
        header::{CACHE_CONTROL, CONTENT_TYPE},
    },
    response::Response,
};
use domain::{ChatRequest, ChatResponse, TraceId};
use futures::StreamExt;
use tracing::instrument;

use crate::{
    error::ApiError,
    middleware::ValidatedJson,
    sse::{self, EVENT_STREAM_CONTENT_TYPE},
    state::AppState,
};

/// Handle a chat request with a single answer
#[instrument(skip_all, fields(provider = %request.provider, messages = request.messages.len()))]
pub async fn chat(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let ctx = RequestContext::new(trace_id.clone());

    state
        .chat_service
        .chat(&ctx, &request)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_application(e, &trace_id))
}

/// Handle a chat request as a server-sent event stream
///
/// Once headers are sent the status stays 200; backend failures arrive as
/// the terminal `error` event. Each event is its own body frame.
#[instrument(skip_all, fields(provider = %request.provider, messages = request.messages.len()))]
pub async fn chat_stream(
    State(state): State<AppState>,
    Extension(trace_id): Extension<TraceId>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Response, ApiError> {
    let ctx = RequestContext::new(trace_id.clone());

    let events = state
        .chat_service
        .chat_stream(ctx, &request)
        .map_err(|e| ApiError::from_application(e, &trace_id))?;

    let frames = events.map(|event| Ok::<_, Infallible>(sse::encode(&event)));

    let mut response = Response::new(Body::from_stream(frames));
    let headers = response.headers_mut();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static(EVENT_STREAM_CONTENT_TYPE),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    Ok(response)
}
