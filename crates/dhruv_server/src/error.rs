//! The wire error taxonomy: `CATEGORY.SPECIFIC` codes, mapped to HTTP
//! status and a stable JSON envelope. Internal error types (engine,
//! kernel, config) are mapped here and never leak their raw messages
//! across the boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<&'static str>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("input invalid: {0}")]
    InputInvalid(String),
    #[error("missing required field: {0}")]
    MissingRequired(String),
    #[error("system/ayanamsha incompatible")]
    SystemIncompatible,
    #[error("ayanamsha required for sidereal system")]
    AyanamshaRequired,
    #[error("unsupported ayanamsha id: {0}")]
    AyanamshaUnsupported(String),
    #[error("unsupported body: {0}")]
    BodiesUnsupported(String),
    #[error("instant outside ephemeris coverage")]
    RangeEphemerisOutside,
    #[error("ambiguous local time rejected under as_entered")]
    TimeAmbiguous,
    #[error("nonexistent local time rejected under as_entered")]
    TimeNonexistent,
    #[error("kernel bundle not available")]
    KernelsNotAvailable,
    #[error("compute worker fault")]
    ComputeWorkerFault,
    #[error("ephemeris convergence failed")]
    ComputeConvergenceFailed,
    #[error("service overloaded")]
    ServiceOverloaded,
    #[error("request timed out")]
    ServiceTimeout,
    #[error("service unavailable")]
    ServiceUnavailable,
    #[error("rate limited")]
    RateLimited { retry_after_secs: u64, limit: u32, remaining: u32, reset_secs: u64 },
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputInvalid(_) => "INPUT.INVALID",
            Self::MissingRequired(_) => "INPUT.MISSING_REQUIRED",
            Self::SystemIncompatible => "SYSTEM.INCOMPATIBLE",
            Self::AyanamshaRequired => "AYANAMSHA.REQUIRED",
            Self::AyanamshaUnsupported(_) => "AYANAMSHA.UNSUPPORTED",
            Self::BodiesUnsupported(_) => "BODIES.UNSUPPORTED",
            Self::RangeEphemerisOutside => "RANGE.EPHEMERIS_OUTSIDE",
            Self::TimeAmbiguous => "TIME.AMBIGUOUS",
            Self::TimeNonexistent => "TIME.NONEXISTENT",
            Self::KernelsNotAvailable => "KERNELS.NOT_AVAILABLE",
            Self::ComputeWorkerFault => "COMPUTE.WORKER_FAULT",
            Self::ComputeConvergenceFailed => "COMPUTE.CONVERGENCE_FAILED",
            Self::ServiceOverloaded => "SERVICE.OVERLOADED",
            Self::ServiceTimeout => "SERVICE.TIMEOUT",
            Self::ServiceUnavailable => "SERVICE.UNAVAILABLE",
            Self::RateLimited { .. } => "RATE.LIMITED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InputInvalid(_)
            | Self::MissingRequired(_)
            | Self::SystemIncompatible
            | Self::AyanamshaRequired
            | Self::AyanamshaUnsupported(_)
            | Self::BodiesUnsupported(_)
            | Self::RangeEphemerisOutside
            | Self::TimeAmbiguous
            | Self::TimeNonexistent => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceOverloaded | Self::ServiceTimeout | Self::ServiceUnavailable | Self::KernelsNotAvailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::ComputeWorkerFault | Self::ComputeConvergenceFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::InputInvalid(_) => "Invalid input",
            Self::MissingRequired(_) => "Missing required field",
            Self::SystemIncompatible => "Zodiac system and ayanāṃśa are incompatible",
            Self::AyanamshaRequired => "Ayanāṃśa required for sidereal system",
            Self::AyanamshaUnsupported(_) => "Unsupported ayanāṃśa id",
            Self::BodiesUnsupported(_) => "Unsupported celestial body",
            Self::RangeEphemerisOutside => "Instant outside loaded kernel coverage",
            Self::TimeAmbiguous => "Local time is ambiguous",
            Self::TimeNonexistent => "Local time does not exist",
            Self::KernelsNotAvailable => "Ephemeris kernels not available",
            Self::ComputeWorkerFault => "Compute worker fault",
            Self::ComputeConvergenceFailed => "Ephemeris convergence failed",
            Self::ServiceOverloaded => "Service overloaded",
            Self::ServiceTimeout => "Request timed out",
            Self::ServiceUnavailable => "Service unavailable",
            Self::RateLimited { .. } => "Rate limit exceeded",
        }
    }

    fn tip(&self) -> Option<&'static str> {
        match self {
            Self::AyanamshaRequired => Some("supply `ayanamsha.id` when system is \"sidereal\""),
            Self::SystemIncompatible => Some("omit `ayanamsha` when system is \"tropical\""),
            Self::AyanamshaUnsupported(_) => Some("see /v1/ayanamsha/list for supported ids"),
            Self::RangeEphemerisOutside => Some("request an instant within the loaded bundle's coverage window"),
            _ => None,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            Self::InputInvalid(d) | Self::MissingRequired(d) | Self::AyanamshaUnsupported(d) | Self::BodiesUnsupported(d) => {
                Some(d.clone())
            }
            _ => None,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            title: self.title(),
            detail: self.detail(),
            tip: self.tip(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, Json(self.body())).into_response();
        if let Self::RateLimited { retry_after_secs, limit, remaining, reset_secs } = &self {
            let headers = response.headers_mut();
            headers.insert("Retry-After", retry_after_secs.to_string().parse().unwrap());
            headers.insert("X-RateLimit-Limit", limit.to_string().parse().unwrap());
            headers.insert("X-RateLimit-Remaining", remaining.to_string().parse().unwrap());
            headers.insert("X-RateLimit-Reset", reset_secs.to_string().parse().unwrap());
        }
        response
    }
}

/// Map an [`dhruv_core::EngineError`] onto the wire taxonomy. Raw kernel
/// library messages are logged, never returned to the caller.
pub fn map_engine_error(err: &dhruv_core::EngineError) -> ApiError {
    use dhruv_core::EngineError;
    match err {
        EngineError::EpochOutsideCoverage { .. } => ApiError::RangeEphemerisOutside,
        EngineError::Kernel(jpl_kernel::KernelError::EpochOutOfRange { .. }) => ApiError::RangeEphemerisOutside,
        EngineError::Kernel(jpl_kernel::KernelError::SegmentNotFound { .. }) => ApiError::BodiesUnsupported("no kernel segment for requested body".to_string()),
        EngineError::ChecksumMismatch { .. } | EngineError::MissingFile { .. } => ApiError::KernelsNotAvailable,
        EngineError::Kernel(_) | EngineError::Time(_) => ApiError::ComputeConvergenceFailed,
    }
}
