//! Ayanāṃśa registry: named records resolving to either a formula-based
//! system or a fixed offset, loaded from built-in defaults and overridable
//! from an external definitions file.
//!
//! The registry exists because client-facing ayanāṃśa ids are not quite the
//! same set as [`AyanamshaSystem`] variants: some named systems (e.g.
//! `fagan_bradley_fixed`) are calibrated constants rather than precessed
//! formulas, and the service needs to expose both under distinct ids without
//! conflating them.

use std::collections::HashMap;

use crate::ayanamsha::{AyanamshaSystem, ayanamsha_deg};
use crate::error::VedicError;
use crate::util::normalize_360;

/// How an [`AyanamshaRecord`] computes its value at a given epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AyanamshaKind {
    /// Delegates to a formula-based [`AyanamshaSystem`], precessed to the
    /// ecliptic of date.
    Formula(AyanamshaSystem),
    /// A constant offset in degrees, independent of epoch.
    Fixed(f64),
}

/// A named, resolvable ayanāṃśa definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AyanamshaRecord {
    pub id: String,
    pub kind: AyanamshaKind,
}

/// The set of ayanāṃśa ids known to the service, keyed by their canonical
/// wire name.
///
/// Construct with [`AyanamshaRegistry::default`] for the built-in set, or
/// [`AyanamshaRegistry::with_overrides`] to layer additional fixed-offset
/// records loaded from a definitions file on top of it.
#[derive(Debug, Clone)]
pub struct AyanamshaRegistry {
    records: HashMap<String, AyanamshaRecord>,
}

impl Default for AyanamshaRegistry {
    fn default() -> Self {
        let mut records = HashMap::new();
        for record in default_records() {
            records.insert(record.id.to_ascii_lowercase(), record);
        }
        Self { records }
    }
}

impl AyanamshaRegistry {
    /// Build the default registry, then insert or replace records with
    /// `overrides` (e.g. parsed from an operator-supplied definitions file).
    pub fn with_overrides(overrides: impl IntoIterator<Item = AyanamshaRecord>) -> Self {
        let mut registry = Self::default();
        for record in overrides {
            registry.records.insert(record.id.to_ascii_lowercase(), record);
        }
        registry
    }

    /// Resolve a record by its id (case-insensitive).
    pub fn resolve(&self, id: &str) -> Result<&AyanamshaRecord, VedicError> {
        self.records
            .get(&id.to_ascii_lowercase())
            .ok_or_else(|| VedicError::UnknownSystem(id.to_string()))
    }

    /// All registered ids, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Build the default registry, then layer overrides parsed from a
    /// YAML definitions file: a list of `{ id, kind, parameters }` records,
    /// `kind` one of `formula` (`parameters.formula` names an
    /// [`AyanamshaSystem`]) or `fixed` (`parameters.value_deg` is a constant
    /// offset).
    pub fn from_yaml(content: &str) -> Result<Self, VedicError> {
        let raw: Vec<RawRecord> = serde_yaml::from_str(content)
            .map_err(|e| VedicError::InvalidRegistryFile(e.to_string()))?;

        let mut records = Vec::with_capacity(raw.len());
        for r in raw {
            let kind = match r.kind.as_str() {
                "formula" => {
                    let formula_name = r.parameters.formula.ok_or_else(|| {
                        VedicError::InvalidRegistryFile(format!(
                            "record \"{}\" is kind \"formula\" but has no parameters.formula",
                            r.id
                        ))
                    })?;
                    let system = AyanamshaSystem::from_name(&formula_name).map_err(|_| {
                        VedicError::InvalidRegistryFile(format!(
                            "record \"{}\" names unknown formula \"{formula_name}\"",
                            r.id
                        ))
                    })?;
                    AyanamshaKind::Formula(system)
                }
                "fixed" => {
                    let value_deg = r.parameters.value_deg.ok_or_else(|| {
                        VedicError::InvalidRegistryFile(format!(
                            "record \"{}\" is kind \"fixed\" but has no parameters.value_deg",
                            r.id
                        ))
                    })?;
                    AyanamshaKind::Fixed(value_deg)
                }
                other => {
                    return Err(VedicError::InvalidRegistryFile(format!(
                        "record \"{}\" has unknown kind \"{other}\"",
                        r.id
                    )));
                }
            };
            records.push(AyanamshaRecord { id: r.id, kind });
        }

        Ok(Self::with_overrides(records))
    }

    /// Load and layer overrides from a YAML definitions file on disk; see
    /// [`Self::from_yaml`] for the file shape.
    pub fn load(path: &std::path::Path) -> Result<Self, VedicError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VedicError::InvalidRegistryFile(e.to_string()))?;
        Self::from_yaml(&content)
    }
}

#[derive(Debug, serde::Deserialize)]
struct RawRecord {
    id: String,
    kind: String,
    #[serde(default)]
    parameters: RawParameters,
}

#[derive(Debug, Default, serde::Deserialize)]
struct RawParameters {
    formula: Option<String>,
    value_deg: Option<f64>,
}

/// Evaluate a record's offset in degrees at the given epoch.
///
/// `t_centuries` is Julian centuries of TDB since J2000.0. `use_nutation`
/// selects the true (nutation-corrected) variant for formula-based records;
/// it has no effect on fixed records.
pub fn value(record: &AyanamshaRecord, t_centuries: f64, use_nutation: bool) -> f64 {
    match record.kind {
        AyanamshaKind::Formula(system) => ayanamsha_deg(system, t_centuries, use_nutation),
        AyanamshaKind::Fixed(offset_deg) => offset_deg,
    }
}

/// Subtract an ayanāṃśa offset from a tropical longitude to get the
/// sidereal longitude, normalized to `[0, 360)`.
pub fn apply(tropical_longitude_deg: f64, offset_deg: f64) -> f64 {
    normalize_360(tropical_longitude_deg - offset_deg)
}

fn default_records() -> Vec<AyanamshaRecord> {
    let mut records: Vec<AyanamshaRecord> = AyanamshaSystem::all()
        .iter()
        .map(|&system| AyanamshaRecord {
            id: system.name().to_string(),
            kind: AyanamshaKind::Formula(system),
        })
        .collect();

    // Fagan-Bradley's formula-based variant precesses the Synetic Vernal
    // Point forward/backward from its J2000 reference value like any other
    // system. `fagan_bradley_fixed` instead freezes that same calibration at
    // its commonly-quoted fixed value, for callers that want a constant
    // rather than a precessing anchor.
    records.push(AyanamshaRecord {
        id: "fagan_bradley_fixed".to_string(),
        kind: AyanamshaKind::Fixed(24.736),
    });

    records
}
