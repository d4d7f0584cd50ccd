//! `GET /healthz` (§6.1): process-level liveness plus a shallow dependency
//! summary. Never calls into the worker pool or cache's data path, only
//! their already-maintained counters, so a degraded backend never makes
//! the health check itself slow or blocking.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub kernel_bundle_tag: String,
    pub worker_pool_size: usize,
    pub worker_pool_queue_depth: usize,
    pub cache_l1_entries: usize,
    pub cache_l1_hit_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_l2_reachable: Option<bool>,
    pub rule_set_version: String,
}

pub async fn handle(State(state): State<Arc<AppState>>) -> Response {
    let l2_reachable = state.cache.l2_reachable().await;
    let queue_depth = state.pool.queue_len();
    let degraded = l2_reachable == Some(false) || queue_depth >= state.pool.queue_capacity();

    let body = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" },
        kernel_bundle_tag: state.config.kernels.bundle.clone(),
        worker_pool_size: state.pool.size(),
        worker_pool_queue_depth: queue_depth,
        cache_l1_entries: state.cache.l1_size(),
        cache_l1_hit_rate: state.cache.l1_hit_rate(),
        cache_l2_reachable: l2_reachable,
        rule_set_version: state.rule_set_version.clone(),
    };

    (StatusCode::OK, Json(body)).into_response()
}
