//! Historical patch rules: a mapping from (region × date-range) to
//! timezone-rule overrides, loaded once from a JSON file at startup.

use serde::{Deserialize, Serialize};

use crate::dst_schemes::DstScheme;
use crate::error::TimeResolverError;
use crate::zone_lookup::BoundingBox;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: chrono::NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatchOverride {
    pub zone_id: Option<String>,
    pub offset_seconds: Option<i32>,
    pub dst_rules: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalPatchRule {
    pub id: String,
    pub bounding_box: BoundingBoxDto,
    pub date_range: DateRange,
    pub r#override: PatchOverride,
    pub reason: String,
    pub confidence: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Serde-friendly mirror of [`BoundingBox`] (field names match the wire
/// format; [`BoundingBox`] itself is a plain value type used internally).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBoxDto {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl From<BoundingBoxDto> for BoundingBox {
    fn from(dto: BoundingBoxDto) -> Self {
        BoundingBox {
            min_lat: dto.min_lat,
            max_lat: dto.max_lat,
            min_lon: dto.min_lon,
            max_lon: dto.max_lon,
        }
    }
}

impl HistoricalPatchRule {
    pub fn bbox(&self) -> BoundingBox {
        self.bounding_box.into()
    }

    pub fn dst_scheme(&self) -> Option<DstScheme> {
        self.r#override.dst_rules.as_deref().and_then(DstScheme::from_name)
    }

    pub fn matches(&self, lat: f64, lon: f64, date: chrono::NaiveDate) -> bool {
        self.bbox().contains(lat, lon) && self.date_range.contains(date)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PatchFile {
    patches: std::collections::BTreeMap<String, HistoricalPatchRuleNoId>,
}

/// The on-disk shape omits `id` (it's the map key); reattached on load so
/// callers always have a self-describing [`HistoricalPatchRule`].
#[derive(Debug, Clone, Deserialize)]
struct HistoricalPatchRuleNoId {
    bounding_box: BoundingBoxDto,
    date_range: DateRange,
    r#override: PatchOverride,
    reason: String,
    confidence: String,
    #[serde(default)]
    sources: Vec<String>,
}

/// An immutable, loaded-once registry of historical patch rules.
///
/// Rules are kept in their registry (insertion) order: when several rules
/// match the same request, "first in registry order wins" per the
/// resolution pipeline, so iteration order here is load-bearing.
#[derive(Debug, Clone)]
pub struct PatchRuleSet {
    rules: Vec<HistoricalPatchRule>,
}

impl PatchRuleSet {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in default set, used when no patch file is configured.
    /// Includes the Fort Knox, Kentucky war-time rule: during and after
    /// WWII, Fort Knox and the surrounding gold-depository district kept
    /// Central clock time on an inconsistent schedule relative to the rest
    /// of the state for roughly two decades.
    pub fn built_in_defaults() -> Self {
        Self {
            rules: vec![HistoricalPatchRule {
                id: "fort_knox_wartime_1943".to_string(),
                bounding_box: BoundingBoxDto {
                    min_lat: 37.70,
                    max_lat: 38.05,
                    min_lon: -86.10,
                    max_lon: -85.75,
                },
                date_range: DateRange {
                    start: chrono::NaiveDate::from_ymd_opt(1942, 1, 1).unwrap(),
                    end: chrono::NaiveDate::from_ymd_opt(1967, 12, 31).unwrap(),
                },
                r#override: PatchOverride {
                    zone_id: Some("America/Chicago".to_string()),
                    offset_seconds: None,
                    dst_rules: Some("us_standard".to_string()),
                },
                reason: "Fort Knox and surrounding Bullitt/Hardin county district kept \
                         Central war-time clock on an inconsistent schedule from 1942 \
                         through Kentucky's 1968 zone-line formalization"
                    .to_string(),
                confidence: "medium".to_string(),
                sources: vec!["local almanac records".to_string()],
            }],
        }
    }

    pub fn from_json(content: &str) -> Result<Self, TimeResolverError> {
        let parsed: PatchFile = serde_json::from_str(content)
            .map_err(|e| TimeResolverError::InvalidPatchFile(e.to_string()))?;
        let rules = parsed
            .patches
            .into_iter()
            .map(|(id, r)| HistoricalPatchRule {
                id,
                bounding_box: r.bounding_box,
                date_range: r.date_range,
                r#override: r.r#override,
                reason: r.reason,
                confidence: r.confidence,
                sources: r.sources,
            })
            .collect();
        Ok(Self { rules })
    }

    pub fn load(path: &std::path::Path) -> Result<Self, TimeResolverError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TimeResolverError::InvalidPatchFile(e.to_string()))?;
        Self::from_json(&content)
    }

    /// Rules whose bounding box and date range both match, in registry
    /// order (first element is the one that wins).
    pub fn matching(&self, lat: f64, lon: f64, date: chrono::NaiveDate) -> Vec<&HistoricalPatchRule> {
        self.rules.iter().filter(|r| r.matches(lat, lon, date)).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_default_matches_fort_knox_in_1962() {
        let rules = PatchRuleSet::built_in_defaults();
        let date = chrono::NaiveDate::from_ymd_opt(1962, 7, 2).unwrap();
        let hits = rules.matching(37.840347, -85.949127, date);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "fort_knox_wartime_1943");
    }

    #[test]
    fn no_match_outside_date_range() {
        let rules = PatchRuleSet::built_in_defaults();
        let date = chrono::NaiveDate::from_ymd_opt(1990, 7, 2).unwrap();
        assert!(rules.matching(37.840347, -85.949127, date).is_empty());
    }

    #[test]
    fn first_in_registry_order_wins_when_multiple_match() {
        let json = r#"{
            "patches": {
                "rule_a": {
                    "bounding_box": {"min_lat": 0.0, "max_lat": 10.0, "min_lon": 0.0, "max_lon": 10.0},
                    "date_range": {"start": "2000-01-01", "end": "2000-12-31"},
                    "override": {"zone_id": "Etc/GMT-1"},
                    "reason": "a",
                    "confidence": "high",
                    "sources": []
                },
                "rule_b": {
                    "bounding_box": {"min_lat": 0.0, "max_lat": 10.0, "min_lon": 0.0, "max_lon": 10.0},
                    "date_range": {"start": "2000-01-01", "end": "2000-12-31"},
                    "override": {"zone_id": "Etc/GMT-2"},
                    "reason": "b",
                    "confidence": "high",
                    "sources": []
                }
            }
        }"#;
        let rules = PatchRuleSet::from_json(json).unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2000, 6, 1).unwrap();
        let hits = rules.matching(5.0, 5.0, date);
        assert_eq!(hits.len(), 2);
        // BTreeMap keys sort "rule_a" before "rule_b"; registry order here
        // follows the map's natural iteration order.
        assert_eq!(hits[0].id, "rule_a");
    }
}
