//! Parity profiles and the fixed-offset abbreviation table used by
//! `as_entered`.

use crate::error::TimeResolverError;

/// Policy selector controlling which Time-Resolver rule layers apply and
/// how user-supplied zone hints are honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParityProfile {
    StrictHistory,
    AstroCom,
    Clairvision,
    AsEntered,
}

impl ParityProfile {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "strict_history" => Some(Self::StrictHistory),
            "astro_com" => Some(Self::AstroCom),
            "clairvision" => Some(Self::Clairvision),
            "as_entered" => Some(Self::AsEntered),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::StrictHistory => "strict_history",
            Self::AstroCom => "astro_com",
            Self::Clairvision => "clairvision",
            Self::AsEntered => "as_entered",
        }
    }

    /// Only `strict_history` activates [`crate::patch_rules::HistoricalPatchRule`]s.
    pub fn activates_patches(self) -> bool {
        matches!(self, Self::StrictHistory)
    }
}

/// Canonical UTC offset (seconds) and DST flag for a fixed US zone
/// abbreviation, as accepted verbatim by the `as_entered` profile.
pub fn resolve_abbreviation(abbr: &str) -> Result<(i32, bool), TimeResolverError> {
    let hours_dst = match abbr.to_ascii_uppercase().as_str() {
        "EST" => (-5, false),
        "EDT" => (-4, true),
        "CST" => (-6, false),
        "CDT" => (-5, true),
        "MST" => (-7, false),
        "MDT" => (-6, true),
        "PST" => (-8, false),
        "PDT" => (-7, true),
        _ => return Err(TimeResolverError::UnknownAbbreviation(abbr.to_string())),
    };
    Ok((hours_dst.0 * 3600, hours_dst.1))
}
