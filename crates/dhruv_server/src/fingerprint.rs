//! Deterministic request fingerprinting (§4.E.1 step 3).
//!
//! The fingerprint canonicalizes `(utc, system, ayanāṃśa id, frame, epoch,
//! sorted unique bodies)` into a stable byte string, then hashes it to a
//! 16-hex-digit digest that serves as both the cache key and the response
//! `ETag`.

use chrono::{DateTime, Utc};
use dhruv_core::Body;
use sha2::{Digest, Sha256};

use crate::domain::{EpochKind, FrameType};

pub type Fingerprint = String;

#[allow(clippy::too_many_arguments)]
pub fn compute(
    utc: DateTime<Utc>,
    system: &str,
    ayanamsha_id: Option<&str>,
    frame: FrameType,
    epoch: EpochKind,
    bodies: &[Body],
) -> Fingerprint {
    let mut sorted: Vec<&'static str> = bodies.iter().map(|b| b.name()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let frame_tag = match frame {
        FrameType::EclipticOfDate => "ecliptic_of_date",
        FrameType::Equatorial => "equatorial",
    };
    let epoch_tag = match epoch {
        EpochKind::OfDate => "of_date",
        EpochKind::J2000 => "J2000",
    };

    let ayanamsha_tag = ayanamsha_id.map(|id| id.to_ascii_lowercase());

    let canonical = format!(
        "{}|{}|{}|{}|{}|{}",
        utc.to_rfc3339(),
        system,
        ayanamsha_tag.as_deref().unwrap_or("null"),
        frame_tag,
        epoch_tag,
        sorted.join(","),
    );

    digest_hex16(canonical.as_bytes())
}

/// ETag of an arbitrary canonicalized response body (the value half of a
/// [`crate::cache::CacheEntry`]).
pub fn etag_of(bytes: &[u8]) -> String {
    digest_hex16(bytes)
}

fn digest_hex16(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let full = hasher.finalize();
    hex::encode(&full[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_order_does_not_affect_fingerprint() {
        let utc = "2024-01-01T00:00:00Z".parse().unwrap();
        let a = compute(utc, "tropical", None, FrameType::EclipticOfDate, EpochKind::OfDate, &[Body::Sun, Body::Moon]);
        let b = compute(utc, "tropical", None, FrameType::EclipticOfDate, EpochKind::OfDate, &[Body::Moon, Body::Sun]);
        assert_eq!(a, b);
    }

    #[test]
    fn different_ayanamsha_changes_fingerprint() {
        let utc = "2024-01-01T00:00:00Z".parse().unwrap();
        let a = compute(utc, "sidereal", Some("lahiri"), FrameType::EclipticOfDate, EpochKind::OfDate, &[Body::Sun]);
        let b = compute(utc, "sidereal", Some("raman"), FrameType::EclipticOfDate, EpochKind::OfDate, &[Body::Sun]);
        assert_ne!(a, b);
    }

    #[test]
    fn deterministic_across_calls() {
        let utc = "2024-01-01T00:00:00Z".parse().unwrap();
        let a = compute(utc, "tropical", None, FrameType::EclipticOfDate, EpochKind::OfDate, &[Body::Sun]);
        let b = compute(utc, "tropical", None, FrameType::EclipticOfDate, EpochKind::OfDate, &[Body::Sun]);
        assert_eq!(a, b);
    }
}
