//! Cartesian ↔ Spherical coordinate conversion.

use std::f64::consts::PI;

/// Spherical coordinates: longitude, latitude, distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalCoords {
    /// Longitude in radians, range [0, 2π).
    /// Measured in the x-y plane from +x toward +y.
    pub lon_rad: f64,
    /// Latitude in radians, range [-π/2, π/2].
    /// Elevation above the x-y plane.
    pub lat_rad: f64,
    /// Distance from origin in km.
    pub distance_km: f64,
}

impl SphericalCoords {
    /// Longitude in degrees, range [0, 360).
    pub fn lon_deg(&self) -> f64 {
        self.lon_rad.to_degrees()
    }

    /// Latitude in degrees, range [-90, 90].
    pub fn lat_deg(&self) -> f64 {
        self.lat_rad.to_degrees()
    }
}

/// Convert Cartesian `[x, y, z]` (km) to spherical coordinates.
///
/// Longitude is measured in the x-y plane from +x toward +y.
/// Latitude is elevation above the x-y plane.
pub fn cartesian_to_spherical(xyz: &[f64; 3]) -> SphericalCoords {
    let x = xyz[0];
    let y = xyz[1];
    let z = xyz[2];

    let r = (x * x + y * y + z * z).sqrt();

    if r == 0.0 {
        return SphericalCoords {
            lon_rad: 0.0,
            lat_rad: 0.0,
            distance_km: 0.0,
        };
    }

    let lon = y.atan2(x);
    let lat = (z / r).asin();

    SphericalCoords {
        lon_rad: if lon < 0.0 { lon + 2.0 * PI } else { lon },
        lat_rad: lat,
        distance_km: r,
    }
}

/// Convert spherical coordinates back to Cartesian `[x, y, z]` (km).
pub fn spherical_to_cartesian(s: &SphericalCoords) -> [f64; 3] {
    let cos_lat = s.lat_rad.cos();
    [
        s.distance_km * cos_lat * s.lon_rad.cos(),
        s.distance_km * cos_lat * s.lon_rad.sin(),
        s.distance_km * s.lat_rad.sin(),
    ]
}

/// Spherical position plus rates of change, used to derive
/// `speed_deg_per_day` and retrograde status from a Cartesian state vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalState {
    pub coords: SphericalCoords,
    /// Rate of change of longitude, radians per unit time (same time unit
    /// as the input velocity, typically days).
    pub lon_rate_rad: f64,
    /// Rate of change of latitude, radians per unit time.
    pub lat_rate_rad: f64,
    /// Rate of change of distance, km per unit time.
    pub distance_rate_km: f64,
}

impl SphericalState {
    /// Longitude rate in degrees per unit time.
    pub fn lon_rate_deg(&self) -> f64 {
        self.lon_rate_rad.to_degrees()
    }
}

/// Convert a Cartesian state vector (position + velocity, km and km/unit
/// time) into spherical position and rates.
///
/// Differentiates `lon = atan2(y, x)` and `lat = asin(z / r)` with respect
/// to time using the chain rule on the Cartesian velocity components.
pub fn cartesian_state_to_spherical_state(xyz: &[f64; 3], v_xyz: &[f64; 3]) -> SphericalState {
    let coords = cartesian_to_spherical(xyz);
    let (x, y, z) = (xyz[0], xyz[1], xyz[2]);
    let (vx, vy, vz) = (v_xyz[0], v_xyz[1], v_xyz[2]);

    let r = coords.distance_km;
    if r == 0.0 {
        return SphericalState {
            coords,
            lon_rate_rad: 0.0,
            lat_rate_rad: 0.0,
            distance_rate_km: 0.0,
        };
    }

    let rho2 = x * x + y * y; // projection onto the x-y plane, squared
    let lon_rate_rad = if rho2 > 0.0 {
        (x * vy - y * vx) / rho2
    } else {
        0.0
    };

    let rho = rho2.sqrt();
    let r2 = r * r;
    let lat_rate_rad = if rho > 0.0 {
        (vz * rho2 - z * (x * vx + y * vy)) / (r2 * rho)
    } else {
        0.0
    };

    let distance_rate_km = (x * vx + y * vy + z * vz) / r;

    SphericalState {
        coords,
        lon_rate_rad,
        lat_rate_rad,
        distance_rate_km,
    }
}
