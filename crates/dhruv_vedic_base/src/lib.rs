//! Sidereal reference systems and lunar node longitudes.
//!
//! This crate provides:
//! - Ayanamsha computation for 20 sidereal reference systems
//! - Mean and true lunar node (Rahu/Ketu) longitudes
//!
//! All implementations are clean-room, derived from IAU standards
//! and public astronomical formulas.

mod ayanamsha_anchor;
mod util;

pub mod ayanamsha;
pub mod error;
pub mod lunar_nodes;
pub mod registry;

pub use ayanamsha::{
    AyanamshaSystem, ayanamsha_deg, ayanamsha_deg_with_model, ayanamsha_mean_deg,
    ayanamsha_mean_deg_with_model, ayanamsha_true_deg, ayanamsha_true_deg_with_model,
    jd_tdb_to_centuries, tdb_seconds_to_centuries,
};
pub use error::VedicError;
pub use lunar_nodes::{
    LunarNode, NodeMode, lunar_node_deg, mean_ketu_deg, mean_rahu_deg, true_ketu_deg,
    true_rahu_deg,
};
pub use registry::{AyanamshaKind, AyanamshaRecord, AyanamshaRegistry};
