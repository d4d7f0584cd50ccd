//! The Time Resolver: converts a naive local civil datetime plus
//! (latitude, longitude) into a UTC instant, applying a prioritized stack
//! of historical rule overrides and one of four parity profiles.
//!
//! This crate has no knowledge of HTTP, caching, or the ephemeris
//! primitive — it is a pure function of (local time, place, profile,
//! rule-set) to [`TimeResolutionResult`]. `dhruv_server`'s Orchestrator is
//! the only caller, and may cache resolutions under its own fingerprint.

pub mod dst_schemes;
pub mod error;
pub mod parity;
pub mod patch_rules;
pub mod resolver;
pub mod zone_lookup;

pub use dst_schemes::DstScheme;
pub use error::TimeResolverError;
pub use parity::ParityProfile;
pub use patch_rules::{HistoricalPatchRule, PatchRuleSet};
pub use resolver::{resolve, Confidence, ResolverInput, TimeResolutionResult};
pub use zone_lookup::{lookup_zone, ZoneLookupResult, ZoneLookupTier};
