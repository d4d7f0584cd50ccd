//! Lunar node (Rahu/Ketu) longitude computation.
//!
//! Provides mean and true positions of the Moon's ascending node (Rahu)
//! and descending node (Ketu = Rahu + 180 deg).
//!
//! Mean node: polynomial from IERS Conventions 2010, Table 5.2e (the 5th
//! Delaunay argument, already in `dhruv_frames::fundamental_arguments`).
//!
//! True node: mean + short-period perturbation corrections (13 sinusoidal
//! terms from Meeus, *Astronomical Algorithms* 2nd ed., Chapter 47).

use crate::util::normalize_360;
use dhruv_frames::fundamental_arguments;

/// Which lunar node to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LunarNode {
    /// Ascending node (Rahu / North Node).
    Rahu,
    /// Descending node (Ketu / South Node). Always Rahu + 180 deg.
    Ketu,
}

/// Array of all lunar node variants, in index order.
pub const ALL_NODES: [LunarNode; 2] = [LunarNode::Rahu, LunarNode::Ketu];

impl LunarNode {
    /// All node variants in index order.
    pub const fn all() -> &'static [LunarNode] {
        &ALL_NODES
    }
}

/// Mean or true (nutation-perturbed) node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeMode {
    /// Mean node: smooth polynomial motion only.
    #[default]
    Mean,
    /// True node: mean + short-period perturbation corrections.
    True,
}

/// Array of all node mode variants, in index order.
pub const ALL_MODES: [NodeMode; 2] = [NodeMode::Mean, NodeMode::True];

impl NodeMode {
    /// All mode variants in index order.
    pub const fn all() -> &'static [NodeMode] {
        &ALL_MODES
    }
}

/// Mean Rahu (ascending node) ecliptic longitude in degrees `[0, 360)`.
///
/// `t` = Julian centuries of TDB since J2000.0.
///
/// Uses the 5th Delaunay fundamental argument (mean longitude of the
/// ascending node, Omega) from IERS Conventions 2010, Table 5.2e.
pub fn mean_rahu_deg(t: f64) -> f64 {
    let args = fundamental_arguments(t);
    normalize_360(args[4].to_degrees())
}

/// Mean Ketu (descending node) ecliptic longitude in degrees `[0, 360)`.
pub fn mean_ketu_deg(t: f64) -> f64 {
    normalize_360(mean_rahu_deg(t) + 180.0)
}

/// Short-period perturbation correction for the true node, in degrees.
///
/// 13 sinusoidal terms from Meeus, *Astronomical Algorithms* (2nd ed.),
/// Chapter 47, Table 47.B. Each term is a sine of a linear combination
/// of Delaunay arguments, with amplitude in degrees.
///
/// `args` = `[l, l', F, D, Omega]` in radians (from `fundamental_arguments`).
fn node_perturbation_deg(args: &[f64; 5]) -> f64 {
    #[rustfmt::skip]
    static TERMS: [[f64; 6]; 13] = [
        // nl   nl'   nF    nD    nOm   amplitude (deg)
        [ 0.0,  0.0,  0.0,  0.0,  1.0, -1.4979],
        [ 0.0,  0.0,  2.0, -2.0,  0.0,  0.1500],
        [ 0.0,  0.0,  2.0,  0.0,  0.0, -0.1226],
        [ 0.0,  0.0,  0.0,  0.0,  2.0,  0.1176],
        [ 1.0,  0.0,  0.0,  0.0,  0.0, -0.0801],
        [ 0.0,  1.0,  0.0,  0.0,  0.0,  0.0056],
        [ 0.0,  0.0,  2.0,  0.0, -2.0, -0.0047],
        [ 1.0,  0.0,  2.0,  0.0,  0.0, -0.0043],
        [ 0.0,  0.0,  2.0, -2.0,  2.0,  0.0040],
        [ 0.0,  1.0,  0.0,  0.0, -1.0,  0.0037],
        [ 0.0,  0.0,  0.0,  2.0,  0.0, -0.0030],
        [ 2.0,  0.0,  0.0,  0.0,  0.0, -0.0020],
        [ 0.0,  1.0,  2.0, -2.0,  0.0,  0.0015],
    ];

    let mut correction = 0.0_f64;
    for term in &TERMS {
        let angle = term[0] * args[0]
            + term[1] * args[1]
            + term[2] * args[2]
            + term[3] * args[3]
            + term[4] * args[4];
        correction += term[5] * angle.sin();
    }
    correction
}

/// True Rahu (ascending node) ecliptic longitude in degrees `[0, 360)`.
///
/// Mean node plus short-period perturbation corrections.
pub fn true_rahu_deg(t: f64) -> f64 {
    let args = fundamental_arguments(t);
    let mean = args[4].to_degrees();
    let perturbation = node_perturbation_deg(&args);
    normalize_360(mean + perturbation)
}

/// True Ketu (descending node) ecliptic longitude in degrees `[0, 360)`.
pub fn true_ketu_deg(t: f64) -> f64 {
    normalize_360(true_rahu_deg(t) + 180.0)
}

/// Unified entry point: compute lunar node longitude in degrees `[0, 360)`.
///
/// Matches the pattern of `ayanamsha_deg(system, t, use_nutation)`.
pub fn lunar_node_deg(node: LunarNode, t: f64, mode: NodeMode) -> f64 {
    match (node, mode) {
        (LunarNode::Rahu, NodeMode::Mean) => mean_rahu_deg(t),
        (LunarNode::Ketu, NodeMode::Mean) => mean_ketu_deg(t),
        (LunarNode::Rahu, NodeMode::True) => true_rahu_deg(t),
        (LunarNode::Ketu, NodeMode::True) => true_ketu_deg(t),
    }
}
