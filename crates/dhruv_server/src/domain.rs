//! Wire-format request/response types and the request-level validation
//! rules from §3 (system × ayanāṃśa, frame × epoch compatibility).

use chrono::{DateTime, Utc};
use dhruv_core::Body;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSystem {
    Tropical,
    Sidereal,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    EclipticOfDate,
    Equatorial,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EpochKind {
    OfDate,
    J2000,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameSpec {
    #[serde(rename = "type")]
    pub kind: FrameType,
}

impl Default for FrameSpec {
    fn default() -> Self {
        Self { kind: FrameType::EclipticOfDate }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AyanamshaSpec {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSpec {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WhenSpec {
    Utc { utc: DateTime<Utc> },
    Local { local_datetime: String, place: PlaceSpec },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionsRequest {
    pub when: WhenSpec,
    pub system: ZodiacSystem,
    #[serde(default)]
    pub ayanamsha: Option<AyanamshaSpec>,
    #[serde(default)]
    pub frame: Option<FrameSpec>,
    #[serde(default)]
    pub epoch: Option<EpochKind>,
    pub bodies: Vec<String>,
    #[serde(default)]
    pub parity_profile: Option<String>,
}

/// Validate the `frame × epoch` and `system × ayanāṃśa` compatibility
/// rules from §3 and parse `bodies` into the closed [`Body`] set. This
/// runs before any other work (time resolution, cache lookup, dispatch).
pub struct ValidatedRequest {
    pub frame: FrameType,
    pub epoch: EpochKind,
    pub bodies: Vec<Body>,
}

pub fn validate(req: &PositionsRequest) -> Result<ValidatedRequest, ApiError> {
    let frame = req.frame.as_ref().map(|f| f.kind).unwrap_or(FrameType::EclipticOfDate);
    let epoch = req.epoch.unwrap_or(EpochKind::OfDate);

    match (frame, epoch) {
        (FrameType::EclipticOfDate, EpochKind::OfDate) => {}
        (FrameType::Equatorial, EpochKind::J2000) => {}
        _ => {
            return Err(ApiError::InputInvalid(
                "frame/epoch combination must be (ecliptic_of_date, of_date) or (equatorial, J2000)".to_string(),
            ));
        }
    }

    match (&req.system, &req.ayanamsha) {
        (ZodiacSystem::Sidereal, None) => return Err(ApiError::AyanamshaRequired),
        (ZodiacSystem::Tropical, Some(_)) => return Err(ApiError::SystemIncompatible),
        _ => {}
    }

    if req.bodies.is_empty() {
        return Err(ApiError::MissingRequired("bodies must contain at least one entry".to_string()));
    }

    let mut bodies = Vec::with_capacity(req.bodies.len());
    for name in &req.bodies {
        match Body::from_name(name) {
            Some(b) if b != Body::Earth => bodies.push(b),
            _ => return Err(ApiError::BodiesUnsupported(name.clone())),
        }
    }

    Ok(ValidatedRequest { frame, epoch, bodies })
}

/// The twelve 30-degree western zodiac sign names, shared by tropical and
/// sidereal longitudes alike.
pub const SIGN_NAMES: [&str; 12] = [
    "Aries", "Taurus", "Gemini", "Cancer", "Leo", "Virgo", "Libra", "Scorpio", "Sagittarius", "Capricorn",
    "Aquarius", "Pisces",
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Dms {
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

pub fn deg_to_dms(deg_in_sign: f64) -> Dms {
    let total_seconds = deg_in_sign * 3600.0;
    let degrees = (total_seconds / 3600.0).floor() as u32;
    let remainder = total_seconds - (degrees as f64) * 3600.0;
    let minutes = (remainder / 60.0).floor() as u32;
    let seconds = remainder - (minutes as f64) * 60.0;
    Dms { degrees, minutes, seconds }
}

pub fn sign_for_longitude(lon_deg: f64) -> (&'static str, f64) {
    let normalized = lon_deg.rem_euclid(360.0);
    let index = (normalized / 30.0).floor() as usize;
    let index = index.min(11);
    (SIGN_NAMES[index], normalized - index as f64 * 30.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionResultDto {
    pub body: String,
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_au: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_deg_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ra_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dec_deg: Option<f64>,
    pub sign: &'static str,
    pub degree_in_sign: f64,
    pub dms: Dms,
    pub is_retrograde: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AyanamshaProvenance {
    pub id: String,
    pub value_deg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Provenance {
    pub kernel_bundle_tag: String,
    pub ephemeris_tag_for_instant: String,
    pub frame: String,
    pub epoch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ayanamsha: Option<AyanamshaProvenance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_resolver: Option<crate::timeresolve::TimeResolutionDto>,
    pub rule_set_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionsResponse {
    pub utc: DateTime<Utc>,
    pub bodies: Vec<PositionResultDto>,
    pub provenance: Provenance,
    pub etag: String,
}
