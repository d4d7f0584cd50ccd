//! `POST /v1/time/resolve` (§6.1).
//!
//! Unlike `positions`, ambiguous/nonexistent local times are not silently
//! resolved with a warning here: under the `as_entered` parity profile the
//! caller asked for the literal wall-clock reading, so an ambiguity or gap
//! must come back as `TIME.AMBIGUOUS` / `TIME.NONEXISTENT` rather than the
//! resolver's best-guess pick. The resolver itself never models this as an
//! error (see `dhruv_timezone::resolver`), so this route inspects the
//! resulting `warnings` text to decide.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dhruv_timezone::ParityProfile;
use serde::Deserialize;

use crate::domain::PlaceSpec;
use crate::error::ApiError;
use crate::state::AppState;
use crate::timeresolve::TimeResolutionDto;

#[derive(Debug, Deserialize)]
pub struct TimeResolveRequest {
    pub local_datetime: String,
    pub place: PlaceSpec,
    #[serde(default)]
    pub parity_profile: Option<String>,
    #[serde(default)]
    pub user_provided_zone: Option<String>,
    #[serde(default)]
    pub user_provided_offset_seconds: Option<i32>,
    #[serde(default)]
    pub user_assume_dst: Option<bool>,
}

pub async fn handle(State(state): State<Arc<AppState>>, Json(req): Json<TimeResolveRequest>) -> Response {
    match resolve(&state, req) {
        Ok(dto) => {
            state.metrics.record_http_request("POST", "/v1/time/resolve", 200, 0.0);
            Json(dto).into_response()
        }
        Err(err) => {
            state.metrics.record_http_request("POST", "/v1/time/resolve", err.status().as_u16(), 0.0);
            state.metrics.record_error(err.code(), "client");
            err.into_response()
        }
    }
}

fn resolve(state: &AppState, req: TimeResolveRequest) -> Result<TimeResolutionDto, ApiError> {
    let default_profile = ParityProfile::from_name(&state.config.time.parity_profile_default)
        .unwrap_or(ParityProfile::StrictHistory);
    let parity_profile = req
        .parity_profile
        .as_deref()
        .and_then(ParityProfile::from_name)
        .unwrap_or(default_profile);

    let input = dhruv_timezone::ResolverInput {
        local_datetime: req.local_datetime,
        lat: req.place.lat,
        lon: req.place.lon,
        parity_profile,
        user_provided_zone: req.user_provided_zone,
        user_provided_offset_seconds: req.user_provided_offset_seconds,
        user_assume_dst: req.user_assume_dst,
        ..Default::default()
    };

    let result = dhruv_timezone::resolve(&input, &state.patch_rules)
        .map_err(|e| ApiError::InputInvalid(e.to_string()))?;

    if matches!(parity_profile, ParityProfile::AsEntered) {
        if result.warnings.iter().any(|w| w.contains("ambiguous")) {
            return Err(ApiError::TimeAmbiguous);
        }
        if result.warnings.iter().any(|w| w.contains("does not exist") || w.contains("gap")) {
            return Err(ApiError::TimeNonexistent);
        }
    }

    Ok(TimeResolutionDto::from(&result))
}
