//! Request interceptors
//!
//! The router is built from an explicit, ordered list of interceptors. The
//! first entry is the outermost layer and sees the request first.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Interceptor {
    /// Log method, URI and arrival time of every request
    RequestLog,
    /// Propagate or assign an `x-request-id`
    RequestId,
    /// HTTP spans from `tower_http`
    Trace,
    /// Permissive CORS headers
    Cors,
}

impl Interceptor {
    pub fn default_chain() -> Vec<Interceptor> {
        vec![
            Interceptor::Trace,
            Interceptor::RequestId,
            Interceptor::RequestLog,
        ]
    }
}

/// Wrap `router` in `interceptors`, first entry outermost
pub fn apply(router: Router, interceptors: &[Interceptor]) -> Router {
    interceptors
        .iter()
        .rev()
        .fold(router, |router, interceptor| match interceptor {
            Interceptor::RequestLog => router.layer(axum::middleware::from_fn(request_log)),
            Interceptor::RequestId => router.layer(axum::middleware::from_fn(request_id)),
            Interceptor::Trace => router.layer(TraceLayer::new_for_http()),
            Interceptor::Cors => router.layer(CorsLayer::permissive()),
        })
}

/// Log every inbound request before it reaches a handler
pub async fn request_log(request: Request, next: Next) -> Response {
    tracing::info!(
        method = %request.method(),
        uri = %request.uri(),
        timestamp_ms = chrono::Utc::now().timestamp_millis(),
        "request",
    );

    next.run(request).await
}

/// Reuse the caller's `x-request-id` or generate a UUID v4, and return it
/// in the response headers.
pub async fn request_id(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    let span = tracing::info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
