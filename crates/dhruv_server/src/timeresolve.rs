//! Serde-serializable mirror of [`dhruv_timezone::TimeResolutionResult`],
//! used both as `positions` response provenance and as the body of
//! `POST /v1/time/resolve`.

use dhruv_timezone::TimeResolutionResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeResolutionDto {
    pub utc: String,
    pub zone_id: String,
    pub offset_seconds: i32,
    pub dst_active: bool,
    pub confidence: &'static str,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patches_applied: Vec<String>,
}

impl From<&TimeResolutionResult> for TimeResolutionDto {
    fn from(result: &TimeResolutionResult) -> Self {
        Self {
            utc: result.utc.to_rfc3339(),
            zone_id: result.zone_id.clone(),
            offset_seconds: result.offset_seconds,
            dst_active: result.dst_active,
            confidence: result.confidence.as_str(),
            reason: result.reason.clone(),
            notes: result.notes.clone(),
            warnings: result.warnings.clone(),
            patches_applied: result.patches_applied.clone(),
        }
    }
}

impl From<TimeResolutionResult> for TimeResolutionDto {
    fn from(result: TimeResolutionResult) -> Self {
        Self::from(&result)
    }
}
