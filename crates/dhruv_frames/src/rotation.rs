//! ICRF/J2000 equatorial <-> mean ecliptic-of-J2000 rotation.
//!
//! A single rotation about the x-axis by the J2000 mean obliquity of the
//! ecliptic relates the two frames. This is the conventional first step
//! before applying precession to reach the ecliptic-of-date.

use crate::obliquity::{COS_OBL, SIN_OBL};

/// Rotate a vector from the ICRF/J2000 equatorial frame into the mean
/// ecliptic-of-J2000 frame.
pub fn icrf_to_ecliptic(v: &[f64; 3]) -> [f64; 3] {
    [
        v[0],
        COS_OBL * v[1] + SIN_OBL * v[2],
        -SIN_OBL * v[1] + COS_OBL * v[2],
    ]
}

/// Rotate a vector from the mean ecliptic-of-J2000 frame into the
/// ICRF/J2000 equatorial frame. Inverse of [`icrf_to_ecliptic`].
pub fn ecliptic_to_icrf(v: &[f64; 3]) -> [f64; 3] {
    [
        v[0],
        COS_OBL * v[1] - SIN_OBL * v[2],
        SIN_OBL * v[1] + COS_OBL * v[2],
    ]
}
