//! The Time Resolver: local civil datetime + (lat, lon) → UTC, with
//! provenance. Deterministic: identical inputs, rule-set version, and
//! parity profile always produce an identical result.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::dst_schemes::DstScheme;
use crate::error::TimeResolverError;
use crate::parity::{self, ParityProfile};
use crate::patch_rules::PatchRuleSet;
use crate::zone_lookup::{self, ZoneLookupTier};

/// How confident the resolver is in its own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Inputs to [`resolve`].
#[derive(Debug, Clone)]
pub struct ResolverInput {
    pub local_datetime: String,
    pub lat: f64,
    pub lon: f64,
    pub parity_profile: ParityProfile,
    pub user_provided_zone: Option<String>,
    pub user_provided_offset_seconds: Option<i32>,
    pub user_assume_dst: Option<bool>,
    /// Radius, in km, for the nearest-known-city zone lookup tier.
    pub city_radius_km: f64,
}

impl Default for ResolverInput {
    fn default() -> Self {
        Self {
            local_datetime: String::new(),
            lat: 0.0,
            lon: 0.0,
            parity_profile: ParityProfile::StrictHistory,
            user_provided_zone: None,
            user_provided_offset_seconds: None,
            user_assume_dst: None,
            city_radius_km: 100.0,
        }
    }
}

/// Output of the resolver, consumed by the Orchestrator and reported in
/// response provenance.
#[derive(Debug, Clone)]
pub struct TimeResolutionResult {
    pub utc: DateTime<Utc>,
    pub zone_id: String,
    pub offset_seconds: i32,
    pub dst_active: bool,
    pub confidence: Confidence,
    pub reason: String,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
    pub patches_applied: Vec<String>,
}

fn parse_local_datetime(raw: &str) -> Result<NaiveDateTime, TimeResolverError> {
    // UTC designators belong to the separate `when.utc` input path, never here.
    if raw.ends_with('Z') || raw.contains('+') || raw.trim_end().ends_with("UTC") {
        return Err(TimeResolverError::UnexpectedTimezoneSuffix(raw.to_string()));
    }
    // Also reject a trailing "-HH:MM" offset, but not a BCE-style leading
    // minus sign (none are in scope) or date-internal hyphens.
    if raw.len() > 6 && raw[raw.len() - 6..].starts_with('-') && raw[raw.len() - 3..].starts_with(':') {
        return Err(TimeResolverError::UnexpectedTimezoneSuffix(raw.to_string()));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    Err(TimeResolverError::UnparseableDatetime(raw.to_string()))
}

/// Run the full resolution pipeline (§4.C steps 1–7).
pub fn resolve(
    input: &ResolverInput,
    patches: &PatchRuleSet,
) -> Result<TimeResolutionResult, TimeResolverError> {
    let naive = parse_local_datetime(&input.local_datetime)?;
    let year = naive.year();
    if !(1000..=3000).contains(&year) {
        return Err(TimeResolverError::YearOutOfRange { year });
    }

    let mut notes = Vec::new();
    let mut warnings = Vec::new();
    let mut patches_applied = Vec::new();

    // Step 1: coordinate -> zone.
    let lookup = zone_lookup::lookup_zone(input.lat, input.lon, input.city_radius_km)?;
    let mut zone_id = lookup.zone_id.clone();
    if lookup.tier == ZoneLookupTier::CoarseFallback {
        notes.push(format!("zone resolved via coarse longitude-band fallback: {zone_id}"));
    }

    // Step 3: which patch rules (if any) would apply, for a strict_history
    // resolution. Computed regardless of profile so non-strict profiles can
    // still record a compatibility note about rules that would have hit.
    let hits = patches.matching(input.lat, input.lon, naive.date());
    for extra in hits.iter().skip(1) {
        notes.push(format!("patch rule {} also matched but was superseded by registry order", extra.id));
    }

    // Step 4: compute initial UTC from the plain IANA zone.
    let tz: Tz = Tz::from_str(&zone_id).map_err(|_| TimeResolverError::InvalidPatchFile(format!("unknown zone {zone_id}")))?;
    let (mut resolved, mut offset_seconds, mut dst_active) = resolve_against_zone(tz, naive, &mut warnings)?;

    // Step 5 + 6: apply overrides, gated by parity profile.
    let mut reason = format!("IANA rules for {zone_id}");
    let mut confidence = Confidence::High;

    match input.parity_profile {
        ParityProfile::StrictHistory => {
            if let Some(rule) = hits.first() {
                patches_applied.push(rule.id.clone());
                reason = format!("historical patch rule {}: {}", rule.id, rule.reason);
                confidence = Confidence::Medium;

                if let Some(override_zone) = &rule.r#override.zone_id {
                    zone_id = override_zone.clone();
                }
                if let Some(scheme) = rule.dst_scheme() {
                    let tz: Tz = Tz::from_str(&zone_id)
                        .map_err(|_| TimeResolverError::InvalidPatchFile(format!("unknown zone {zone_id}")))?;
                    let std_offset = standard_offset_seconds(tz);
                    dst_active = scheme.is_dst(naive.date());
                    offset_seconds = if dst_active { std_offset + 3600 } else { std_offset };
                    resolved = naive - chrono::Duration::seconds(offset_seconds as i64);
                } else if let Some(fixed_offset) = rule.r#override.offset_seconds {
                    offset_seconds = fixed_offset;
                    resolved = naive - chrono::Duration::seconds(offset_seconds as i64);
                }
            }
        }
        ParityProfile::AstroCom | ParityProfile::Clairvision => {
            if !hits.is_empty() {
                notes.push(format!(
                    "{} profile: discarded {} matching patch override(s), using raw IANA result",
                    input.parity_profile.name(),
                    hits.len()
                ));
            }
        }
        ParityProfile::AsEntered => {
            confidence = Confidence::Low;
            if let Some(abbr) = &input.user_provided_zone {
                match parity::resolve_abbreviation(abbr) {
                    Ok((abbr_offset, abbr_dst)) => {
                        if abbr_offset != offset_seconds {
                            warnings.push(format!(
                                "user-provided zone {abbr} (offset {abbr_offset}s) disagrees with computed offset {offset_seconds}s"
                            ));
                        }
                        offset_seconds = abbr_offset;
                        dst_active = input.user_assume_dst.unwrap_or(abbr_dst);
                        reason = format!("user-provided zone abbreviation {abbr}");
                    }
                    Err(_) => {
                        // Not one of the fixed abbreviations; treat as an
                        // IANA zone name override instead.
                        if let Ok(user_tz) = Tz::from_str(abbr) {
                            let (r, off, dst) = resolve_against_zone(user_tz, naive, &mut warnings)?;
                            if off != offset_seconds {
                                warnings.push(format!(
                                    "user-provided zone {abbr} (offset {off}s) disagrees with computed offset {offset_seconds}s"
                                ));
                            }
                            resolved = r;
                            offset_seconds = off;
                            dst_active = dst;
                            zone_id = abbr.clone();
                            reason = format!("user-provided zone {abbr}");
                        } else {
                            warnings.push(format!("unrecognized user-provided zone: {abbr}"));
                        }
                    }
                }
            } else if let Some(user_offset) = input.user_provided_offset_seconds {
                if user_offset != offset_seconds {
                    warnings.push(format!(
                        "user-provided offset {user_offset}s disagrees with computed offset {offset_seconds}s"
                    ));
                }
                offset_seconds = user_offset;
                resolved = naive - chrono::Duration::seconds(offset_seconds as i64);
                reason = "user-provided fixed offset".to_string();
            }
        }
    }

    if lookup.tier == ZoneLookupTier::CoarseFallback && confidence == Confidence::High {
        confidence = Confidence::Low;
    }

    let utc = DateTime::<Utc>::from_naive_utc_and_offset(resolved, Utc);

    Ok(TimeResolutionResult {
        utc,
        zone_id,
        offset_seconds,
        dst_active,
        confidence,
        reason,
        notes,
        warnings,
        patches_applied,
    })
}

/// Convert `naive` as wall-clock time in `tz` to (naive UTC, offset
/// seconds, dst flag), handling ambiguous folds and nonexistent gaps
/// deterministically.
fn resolve_against_zone(
    tz: Tz,
    naive: NaiveDateTime,
    warnings: &mut Vec<String>,
) -> Result<(NaiveDateTime, i32, bool), TimeResolverError> {
    use chrono::LocalResult;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => {
            let offset = dt.offset().fix().local_minus_utc();
            Ok((dt.naive_utc(), offset, is_dst_offset(tz, naive, offset)))
        }
        LocalResult::Ambiguous(earliest, _latest) => {
            warnings.push("local time is ambiguous (DST fall-back); resolved to the first (pre-transition) occurrence".to_string());
            let offset = earliest.offset().fix().local_minus_utc();
            Ok((earliest.naive_utc(), offset, is_dst_offset(tz, naive, offset)))
        }
        LocalResult::None => {
            warnings.push("local time does not exist (DST spring-forward gap); advanced to the first valid post-gap instant".to_string());
            let before = tz.from_local_datetime(&(naive - chrono::Duration::days(1)));
            let after = tz.from_local_datetime(&(naive + chrono::Duration::days(1)));
            let offset_before = before.single().map(|d| d.offset().fix().local_minus_utc()).unwrap_or(0);
            let offset_after = after.single().map(|d| d.offset().fix().local_minus_utc()).unwrap_or(0);
            let shift = offset_after - offset_before;
            let adjusted = naive + chrono::Duration::seconds(shift as i64);
            match tz.from_local_datetime(&adjusted) {
                LocalResult::Single(dt) => {
                    let offset = dt.offset().fix().local_minus_utc();
                    Ok((dt.naive_utc(), offset, is_dst_offset(tz, adjusted, offset)))
                }
                _ => Err(TimeResolverError::UnparseableDatetime(format!(
                    "could not resolve local time across DST gap: {naive}"
                ))),
            }
        }
    }
}

fn standard_offset_seconds(tz: Tz) -> i32 {
    // Evaluate in January, which is never DST in the zones this resolver
    // deals with (mostly northern-hemisphere US history).
    let jan = NaiveDateTime::parse_from_str("2020-01-15T12:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
    match tz.from_local_datetime(&jan) {
        chrono::LocalResult::Single(dt) => dt.offset().fix().local_minus_utc(),
        _ => 0,
    }
}

fn is_dst_offset(tz: Tz, naive: NaiveDateTime, offset_seconds: i32) -> bool {
    let _ = naive;
    offset_seconds != standard_offset_seconds(tz)
}
