//! `POST /v1/positions` (§6.1).

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::domain::PositionsRequest;
use crate::error::ApiError;
use crate::orchestrator;
use crate::state::AppState;

pub async fn handle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PositionsRequest>,
) -> Response {
    let started = Instant::now();
    let outcome = orchestrator::handle_positions(&state, req).await;
    let elapsed = started.elapsed().as_secs_f64();

    match outcome {
        Ok(outcome) => {
            state.metrics.record_http_request("POST", "/v1/positions", 200, elapsed);
            let mut response = (axum::http::StatusCode::OK, outcome.body).into_response();
            response
                .headers_mut()
                .insert(axum::http::header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
            if let Ok(etag) = HeaderValue::from_str(&format!("\"{}\"", outcome.etag)) {
                response.headers_mut().insert(axum::http::header::ETAG, etag);
            }
            if let Ok(cache) = HeaderValue::from_str(outcome.cache) {
                response.headers_mut().insert("x-cache", cache);
            }
            response
        }
        Err(err) => {
            state.metrics.record_http_request("POST", "/v1/positions", err.status().as_u16(), elapsed);
            state.metrics.record_error(err.code(), error_category(&err));
            err.into_response()
        }
    }
}

fn error_category(err: &ApiError) -> &'static str {
    if err.status().is_client_error() {
        "client"
    } else {
        "server"
    }
}
