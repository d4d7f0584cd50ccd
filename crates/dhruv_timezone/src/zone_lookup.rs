//! Coordinate → IANA zone resolution.
//!
//! Three layers are tried in priority order: (a) regional overrides for a
//! small set of historically complicated regions, (b) nearest-known-city
//! lookup within a configurable radius, (c) a coarse longitude-band
//! fallback. Callers only see the winning [`ZoneLookupResult`]; which tier
//! produced it is recorded for provenance/confidence purposes.

use crate::error::TimeResolverError;

const EARTH_RADIUS_KM: f64 = 6_371.0088;

/// A rectangular lat/lon bounding box, inclusive on all four edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// A bounding box mapped directly to an IANA zone id, for regions whose
/// history would otherwise confuse a simple nearest-city or longitude-band
/// guess (enclaves that observe a neighboring region's zone, historic
/// county-line splits, etc).
#[derive(Debug, Clone, Copy)]
pub struct RegionOverride {
    pub bbox: BoundingBox,
    pub zone_id: &'static str,
}

/// Complicated-history regions, checked before the nearest-city index.
///
/// These are hand-maintained: each entry exists because a naive
/// lookup (nearest city, or longitude band) would pick the wrong zone for
/// at least part of the box. Kentucky in particular splits Eastern/Central
/// along a famously irregular county line that cuts through several of its
/// nearest cities' natural catchment areas.
pub const REGION_OVERRIDES: &[RegionOverride] = &[
    RegionOverride {
        // West-central Kentucky, Central-time side of the Eastern/Central
        // split (Fort Knox and its surrounding counties).
        bbox: BoundingBox {
            min_lat: 37.5,
            max_lat: 38.2,
            min_lon: -86.3,
            max_lon: -85.6,
        },
        zone_id: "America/Chicago",
    },
    RegionOverride {
        // Indiana historically did not observe DST uniformly; the bulk of
        // the state is Eastern but several western/southwestern counties
        // are Central. This box covers the Central-observing strip.
        bbox: BoundingBox {
            min_lat: 37.8,
            max_lat: 39.2,
            min_lon: -87.9,
            max_lon: -87.0,
        },
        zone_id: "America/Chicago",
    },
];

/// A reference city used for nearest-known-city zone lookup.
#[derive(Debug, Clone, Copy)]
pub struct CityEntry {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub zone_id: &'static str,
}

/// A small built-in gazetteer. Not exhaustive; this is a fallback tier for
/// when no regional override applies, covering major population centers
/// across zone boundaries well enough that most real-world requests land
/// within the default lookup radius of some entry.
pub const CITIES: &[CityEntry] = &[
    CityEntry { name: "New York", lat: 40.7128, lon: -74.0060, zone_id: "America/New_York" },
    CityEntry { name: "Chicago", lat: 41.8781, lon: -87.6298, zone_id: "America/Chicago" },
    CityEntry { name: "Denver", lat: 39.7392, lon: -104.9903, zone_id: "America/Denver" },
    CityEntry { name: "Phoenix", lat: 33.4484, lon: -112.0740, zone_id: "America/Phoenix" },
    CityEntry { name: "Los Angeles", lat: 34.0522, lon: -118.2437, zone_id: "America/Los_Angeles" },
    CityEntry { name: "Anchorage", lat: 61.2181, lon: -149.9003, zone_id: "America/Anchorage" },
    CityEntry { name: "Honolulu", lat: 21.3069, lon: -157.8583, zone_id: "Pacific/Honolulu" },
    CityEntry { name: "Toronto", lat: 43.6532, lon: -79.3832, zone_id: "America/Toronto" },
    CityEntry { name: "Mexico City", lat: 19.4326, lon: -99.1332, zone_id: "America/Mexico_City" },
    CityEntry { name: "Sao Paulo", lat: -23.5505, lon: -46.6333, zone_id: "America/Sao_Paulo" },
    CityEntry { name: "Buenos Aires", lat: -34.6037, lon: -58.3816, zone_id: "America/Argentina/Buenos_Aires" },
    CityEntry { name: "London", lat: 51.5074, lon: -0.1278, zone_id: "Europe/London" },
    CityEntry { name: "Paris", lat: 48.8566, lon: 2.3522, zone_id: "Europe/Paris" },
    CityEntry { name: "Berlin", lat: 52.5200, lon: 13.4050, zone_id: "Europe/Berlin" },
    CityEntry { name: "Moscow", lat: 55.7558, lon: 37.6173, zone_id: "Europe/Moscow" },
    CityEntry { name: "Cairo", lat: 30.0444, lon: 31.2357, zone_id: "Africa/Cairo" },
    CityEntry { name: "Johannesburg", lat: -26.2041, lon: 28.0473, zone_id: "Africa/Johannesburg" },
    CityEntry { name: "Dubai", lat: 25.2048, lon: 55.2708, zone_id: "Asia/Dubai" },
    CityEntry { name: "New Delhi", lat: 28.6139, lon: 77.2090, zone_id: "Asia/Kolkata" },
    CityEntry { name: "Mumbai", lat: 19.0760, lon: 72.8777, zone_id: "Asia/Kolkata" },
    CityEntry { name: "Bangkok", lat: 13.7563, lon: 100.5018, zone_id: "Asia/Bangkok" },
    CityEntry { name: "Shanghai", lat: 31.2304, lon: 121.4737, zone_id: "Asia/Shanghai" },
    CityEntry { name: "Tokyo", lat: 35.6762, lon: 139.6503, zone_id: "Asia/Tokyo" },
    CityEntry { name: "Seoul", lat: 37.5665, lon: 126.9780, zone_id: "Asia/Seoul" },
    CityEntry { name: "Singapore", lat: 1.3521, lon: 103.8198, zone_id: "Asia/Singapore" },
    CityEntry { name: "Jakarta", lat: -6.2088, lon: 106.8456, zone_id: "Asia/Jakarta" },
    CityEntry { name: "Sydney", lat: -33.8688, lon: 151.2093, zone_id: "Australia/Sydney" },
    CityEntry { name: "Perth", lat: -31.9523, lon: 115.8613, zone_id: "Australia/Perth" },
    CityEntry { name: "Auckland", lat: -36.8509, lon: 174.7645, zone_id: "Pacific/Auckland" },
    CityEntry { name: "Reykjavik", lat: 64.1466, lon: -21.9426, zone_id: "Atlantic/Reykjavik" },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneLookupTier {
    RegionOverride,
    NearestCity,
    CoarseFallback,
}

#[derive(Debug, Clone)]
pub struct ZoneLookupResult {
    pub zone_id: String,
    pub tier: ZoneLookupTier,
    /// Populated only for [`ZoneLookupTier::NearestCity`]: the matched
    /// city's name and its great-circle distance from the query point.
    pub nearest_city: Option<(&'static str, f64)>,
}

/// Great-circle distance between two lat/lon points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Resolve (lat, lon) to a zone id, trying each tier in priority order.
/// `city_radius_km` bounds the nearest-city tier (default 100 km per the
/// resolution pipeline's spec).
pub fn lookup_zone(lat: f64, lon: f64, city_radius_km: f64) -> Result<ZoneLookupResult, TimeResolverError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(TimeResolverError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(TimeResolverError::LongitudeOutOfRange(lon));
    }

    if let Some(region) = REGION_OVERRIDES.iter().find(|r| r.bbox.contains(lat, lon)) {
        return Ok(ZoneLookupResult {
            zone_id: region.zone_id.to_string(),
            tier: ZoneLookupTier::RegionOverride,
            nearest_city: None,
        });
    }

    let nearest = CITIES
        .iter()
        .map(|c| (c, haversine_km(lat, lon, c.lat, c.lon)))
        .min_by(|(_, d1), (_, d2)| d1.partial_cmp(d2).unwrap());

    if let Some((city, distance_km)) = nearest {
        if distance_km <= city_radius_km {
            return Ok(ZoneLookupResult {
                zone_id: city.zone_id.to_string(),
                tier: ZoneLookupTier::NearestCity,
                nearest_city: Some((city.name, distance_km)),
            });
        }
    }

    Ok(ZoneLookupResult {
        zone_id: coarse_fallback_zone(lon),
        tier: ZoneLookupTier::CoarseFallback,
        nearest_city: None,
    })
}

/// A fixed-offset `Etc/GMT` zone for the 15-degree longitude band
/// containing `lon`. Note the POSIX/IANA sign convention: `Etc/GMT-5`
/// is 5 hours *ahead* of UTC (east), `Etc/GMT+5` is 5 hours *behind*
/// (west) — backwards from the everyday "+5" meaning a positive offset.
pub fn coarse_fallback_zone(lon: f64) -> String {
    let band = (lon / 15.0).round() as i32;
    let band = band.clamp(-12, 12);
    if band == 0 {
        "Etc/GMT".to_string()
    } else if band > 0 {
        format!("Etc/GMT-{band}")
    } else {
        format!("Etc/GMT+{}", -band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fort_knox_region_override_wins_over_nearest_city() {
        // Fort Knox, KY: 37.840347, -85.949127 — inside the Kentucky
        // Central-time override box, even though Louisville (Eastern) may
        // be geographically closer.
        let result = lookup_zone(37.840347, -85.949127, 100.0).unwrap();
        assert_eq!(result.tier, ZoneLookupTier::RegionOverride);
        assert_eq!(result.zone_id, "America/Chicago");
    }

    #[test]
    fn nearest_city_within_radius() {
        // A point a few km from New York.
        let result = lookup_zone(40.73, -74.02, 100.0).unwrap();
        assert_eq!(result.tier, ZoneLookupTier::NearestCity);
        assert_eq!(result.zone_id, "America/New_York");
    }

    #[test]
    fn coarse_fallback_when_far_from_everything() {
        // Middle of the South Pacific, far from any gazetteer entry.
        let result = lookup_zone(-10.0, -140.0, 100.0).unwrap();
        assert_eq!(result.tier, ZoneLookupTier::CoarseFallback);
    }

    #[test]
    fn coarse_fallback_sign_convention() {
        assert_eq!(coarse_fallback_zone(0.0), "Etc/GMT");
        assert_eq!(coarse_fallback_zone(75.0), "Etc/GMT-5");
        assert_eq!(coarse_fallback_zone(-75.0), "Etc/GMT+5");
    }

    #[test]
    fn out_of_range_latitude_is_error() {
        assert!(lookup_zone(91.0, 0.0, 100.0).is_err());
    }

    #[test]
    fn haversine_zero_for_identical_points() {
        assert!(haversine_km(10.0, 20.0, 10.0, 20.0) < 1e-9);
    }
}
