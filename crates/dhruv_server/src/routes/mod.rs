//! HTTP surface (§6.1): route handlers plus the `Router` they're wired into.

pub mod health;
pub mod metrics;
pub mod positions;
pub mod time_resolve;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderName, Request};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Assemble the full `Router`, wiring every handler to `state` and layering
/// the cross-cutting middleware (request id, tracing, CORS, rate limiting)
/// the way `tower-http`'s own examples compose these layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = if state.config.api.cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins).allow_methods(tower_http::cors::Any)
    };

    Router::new()
        .route("/v1/positions", post(positions::handle))
        .route("/v1/time/resolve", post(time_resolve::handle))
        .route("/healthz", get(health::handle))
        .route("/metrics", get(metrics::handle))
        .layer(middleware::from_fn_with_state(Arc::clone(&state), rate_limit_middleware))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, UuidRequestId))
        .layer(cors)
        .with_state(state)
}

/// Applied before route handlers run, per §4.E.3 ("rate limiting is
/// evaluated before request validation or any other work").
async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ip = client_ip(&request, addr);
    let decision = state.rate_limiter.check(ip, &state.metrics).await;
    if !decision.allowed {
        state.metrics.record_error("RATE.LIMITED", "client");
        return ApiError::RateLimited {
            retry_after_secs: decision.retry_after_secs,
            limit: decision.limit,
            remaining: decision.remaining,
            reset_secs: decision.reset_secs,
        }
        .into_response();
    }
    next.run(request).await
}

/// Prefer the left-most `X-Forwarded-For` hop over the socket address, so
/// rate limiting keys on the real client when the server sits behind a
/// reverse proxy.
fn client_ip(request: &Request<axum::body::Body>, fallback: SocketAddr) -> std::net::IpAddr {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback.ip())
}

/// Fallback request deadline when not overridden by config; `main.rs` wires
/// the configured value into `AppState::request_deadline` instead.
pub const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(10);
