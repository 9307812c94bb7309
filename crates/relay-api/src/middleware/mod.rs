//! Middleware stack for the API server
//!
//! Request ids, tracing, timeouts, CORS, and the rate limit on live lookups.

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    BoxError, Json, Router,
};
use relay_common::{AppError, RateLimitConfig};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use crate::response::ErrorBody;
use crate::state::AppState;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Upper bound for a request; live lookups wait on the platform's REST API
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the shared middleware stack to the router
///
/// Layers run outermost first: request id, tracing, CORS, timeout. CORS wraps
/// the timeout so a timed-out request still carries the CORS headers.
pub fn apply_middleware(router: Router<AppState>) -> Router<AppState> {
    with_layers(router, REQUEST_TIMEOUT)
}

fn with_layers<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        // Timeout (innermost, answered with a JSON 503)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(timeout),
        )
        // CORS
        .layer(cors_layer())
        // Tracing
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Request ID propagation
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID generation (outermost)
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
}

/// Turn a failed middleware service into a JSON error
async fn handle_middleware_error(err: BoxError) -> Response {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!(timeout_secs = REQUEST_TIMEOUT.as_secs(), "Request timed out");
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Request timed out");
    }

    warn!(error = %err, "Unhandled middleware error");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorBody {
        error: message.to_string(),
    };
    (status, Json(body)).into_response()
}

/// Replace the limiter's plain-text 429 body with the JSON error shape
///
/// Rate limit headers such as `retry-after` are kept.
async fn json_rate_limit_body(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    let rejected = error_response(StatusCode::TOO_MANY_REQUESTS, "Too many requests");
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, rejected.into_body())
}

/// Apply a global request rate limit
///
/// Shared by every caller, so a burst of lookups cannot exhaust the bot's
/// REST budget. Only routes that reach the platform should carry it.
///
/// # Errors
/// Fails when the configured rate or burst is zero.
pub fn apply_rate_limit(
    router: Router<AppState>,
    config: &RateLimitConfig,
) -> Result<Router<AppState>, AppError> {
    let replenish_ms = 1_000 / u64::from(config.requests_per_second.max(1));

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(replenish_ms.max(1))
        .burst_size(config.burst)
        .key_extractor(GlobalKeyExtractor)
        .finish()
        .ok_or_else(|| {
            AppError::config(format!(
                "invalid rate limit: {} requests/s, burst {}",
                config.requests_per_second, config.burst
            ))
        })?;

    Ok(router
        .layer(GovernorLayer {
            config: Arc::new(governor_conf),
        })
        .layer(map_response(json_rate_limit_body)))
}

/// Any origin may read; the API is read-only
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_origin(Any)
        .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)])
}
