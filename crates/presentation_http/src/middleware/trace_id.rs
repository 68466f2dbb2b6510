//! Trace ID middleware for request correlation
//!
//! Reuses a valid inbound `x-trace-id` header or generates a fresh id,
//! stores it in the request extensions, runs the request inside a span
//! carrying it and echoes it on the response.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{body::Body, extract::Request, http::header::HeaderValue, response::Response};
use domain::TraceId;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info};

/// The header name for the trace ID
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Layer that adds trace ID handling to HTTP services
#[derive(Debug, Clone, Default)]
pub struct TraceIdLayer;

impl TraceIdLayer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TraceIdLayer {
    type Service = TraceIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceIdService { inner }
    }
}

/// Service that resolves the trace ID for each request
#[derive(Debug, Clone)]
pub struct TraceIdService<S> {
    inner: S,
}

/// Trace id from the request headers, or a new one
fn resolve_trace_id(request: &Request<Body>) -> TraceId {
    let Some(raw) = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
    else {
        return TraceId::generate();
    };

    TraceId::parse(raw).unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring invalid inbound trace id");
        TraceId::generate()
    })
}

impl<S> Service<Request<Body>> for TraceIdService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let trace_id = resolve_trace_id(&request);
        request.extensions_mut().insert(trace_id.clone());

        let span = tracing::info_span!(
            "http_request",
            trace_id = %trace_id,
            method = %request.method(),
            path = %request.uri().path(),
        );

        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let started = Instant::now();

        Box::pin(
            async move {
                let mut response = inner.call(request).await?;

                if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
                    response.headers_mut().insert(TRACE_ID_HEADER, value);
                }

                info!(
                    status = response.status().as_u16(),
                    elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    "Request handled"
                );

                Ok(response)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Router, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn echo(Extension(trace_id): Extension<TraceId>) -> String {
        trace_id.to_string()
    }

    fn app() -> Router {
        Router::new()
            .route("/echo", get(echo))
            .layer(TraceIdLayer::new())
    }

    async fn call(header: Option<&str>) -> (String, String) {
        let mut builder = Request::builder().uri("/echo");
        if let Some(value) = header {
            builder = builder.header(TRACE_ID_HEADER, value);
        }
        let response = app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers()[TRACE_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        (header, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn reuses_valid_inbound_trace_id() {
        let (header, body) = call(Some("client-trace-7")).await;
        assert_eq!(header, "client-trace-7");
        assert_eq!(body, "client-trace-7");
    }

    #[tokio::test]
    async fn generates_trace_id_when_missing() {
        let (header, body) = call(None).await;
        assert!(!header.is_empty());
        assert_eq!(header, body);
    }

    #[tokio::test]
    async fn replaces_invalid_inbound_trace_id() {
        let too_long = "x".repeat(200);
        let (header, _) = call(Some(&too_long)).await;
        assert_ne!(header, too_long);
        assert!(header.len() <= TraceId::MAX_LEN);
    }

    #[test]
    fn layer_is_zero_sized() {
        assert_eq!(std::mem::size_of_val(&TraceIdLayer::new()), 0);
    }
}
