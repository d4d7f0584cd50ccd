//! `GET /metrics` (§6.1): Prometheus text exposition.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

pub async fn handle(State(state): State<Arc<AppState>>) -> Response {
    state.metrics.set_worker_pool_size("default", state.pool.size() as f64);
    state.metrics.set_worker_pool_queue_size("default", state.pool.queue_len() as f64);
    state.metrics.set_cache_size_entries("l1", state.cache.l1_size() as f64);
    state.metrics.set_cache_hit_rate("l1", state.cache.l1_hit_rate());

    let body = state.metrics.encode_text();
    let mut response = body.into_response();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, "text/plain; version=0.0.4".parse().unwrap());
    response
}
