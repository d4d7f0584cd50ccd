//! Celestial body identifiers and their NAIF body codes.

/// A celestial body this engine can compute a position for.
///
/// `TrueNode` and `MeanNode` have no SPK segment of their own; they are
/// derived from the Moon's orbital elements rather than read from a
/// kernel (see [`crate::engine::Engine::query`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    TrueNode,
    MeanNode,
}

impl Body {
    /// The NAIF integer body code used to index SPK segments, or `None`
    /// for the lunar nodes (which are computed, not read from a kernel).
    pub fn naif_code(self) -> Option<i32> {
        match self {
            Body::Sun => Some(10),
            Body::Mercury => Some(199),
            Body::Venus => Some(299),
            Body::Earth => Some(399),
            Body::Moon => Some(301),
            Body::Mars => Some(499),
            Body::Jupiter => Some(599),
            Body::Saturn => Some(699),
            Body::Uranus => Some(799),
            Body::Neptune => Some(899),
            Body::Pluto => Some(999),
            Body::TrueNode | Body::MeanNode => None,
        }
    }

    /// Whether this body is a lunar node (computed from orbital elements
    /// rather than an SPK segment).
    pub fn is_lunar_node(self) -> bool {
        matches!(self, Body::TrueNode | Body::MeanNode)
    }

    /// The canonical lowercase name, as used in request/response wire formats.
    pub fn name(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Earth => "earth",
            Body::Moon => "moon",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::TrueNode => "true_node",
            Body::MeanNode => "mean_node",
        }
    }

    /// Parse from the canonical lowercase name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sun" => Some(Body::Sun),
            "mercury" => Some(Body::Mercury),
            "venus" => Some(Body::Venus),
            "earth" => Some(Body::Earth),
            "moon" => Some(Body::Moon),
            "mars" => Some(Body::Mars),
            "jupiter" => Some(Body::Jupiter),
            "saturn" => Some(Body::Saturn),
            "uranus" => Some(Body::Uranus),
            "neptune" => Some(Body::Neptune),
            "pluto" => Some(Body::Pluto),
            "truenode" | "true_node" | "rahu" => Some(Body::TrueNode),
            "meannode" | "mean_node" => Some(Body::MeanNode),
            _ => None,
        }
    }

    /// The twelve bodies exposed to API clients, in canonical order
    /// (matches the spec's closed CelestialBody set; `Earth` is an
    /// internal observer-only value and is excluded).
    pub const REQUESTABLE: [Body; 12] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::TrueNode,
        Body::MeanNode,
    ];
}
