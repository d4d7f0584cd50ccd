//! Delaunay fundamental arguments and low-precision nutation.
//!
//! Sources:
//! - IERS Conventions 2010, Chapter 5, Table 5.2a (fundamental arguments,
//!   Simon et al. 1994 polynomials as adopted by IAU 2000).
//! - Meeus, *Astronomical Algorithms* (2nd ed.), Chapter 22 (nutation and
//!   obliquity, low-precision series good to about 0.5 arcsec — sufficient
//!   for the "true"-mode ayanamsha correction used here).

use std::f64::consts::TAU;

const AS2R: f64 = std::f64::consts::PI / 648_000.0;

fn wrap_2pi(rad: f64) -> f64 {
    rad.rem_euclid(TAU)
}

/// Delaunay fundamental arguments `[l, l', F, D, Omega]` in radians,
/// wrapped to `[0, 2*pi)`.
///
/// - `l`: mean anomaly of the Moon
/// - `l'`: mean anomaly of the Sun
/// - `F`: mean argument of latitude of the Moon (L - Omega)
/// - `D`: mean elongation of the Moon from the Sun
/// - `Omega`: mean longitude of the ascending node of the Moon's orbit
///
/// `t` is Julian centuries of TDB since J2000.0.
pub fn fundamental_arguments(t: f64) -> [f64; 5] {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let l = 485_868.249_036 + 1_717_915_923.217_8 * t + 31.879_2 * t2 + 0.051_635 * t3
        - 0.000_244_70 * t4;
    let lp = 1_287_104.793_05 + 129_596_581.048_1 * t - 0.553_2 * t2 + 0.000_136 * t3
        - 0.000_011_49 * t4;
    let f = 335_779.526_232 + 1_739_527_262.847_8 * t - 12.751_2 * t2 - 0.001_037 * t3
        + 0.000_004_17 * t4;
    let d = 1_072_260.703_69 + 1_602_961_601.209_0 * t - 6.370_6 * t2 + 0.006_593 * t3
        - 0.000_031_69 * t4;
    let omega = 450_160.398_036 - 6_962_890.543_1 * t + 7.472_2 * t2 + 0.007_702 * t3
        - 0.000_059_39 * t4;

    [
        wrap_2pi(l * AS2R),
        wrap_2pi(lp * AS2R),
        wrap_2pi(f * AS2R),
        wrap_2pi(d * AS2R),
        wrap_2pi(omega * AS2R),
    ]
}

/// Low-precision nutation in longitude and obliquity, in arcseconds.
///
/// Returns `(delta_psi_arcsec, delta_eps_arcsec)`. Uses the four dominant
/// terms of the nutation series (Meeus Ch. 22), accurate to about 0.5
/// arcsec — far smaller than the arcminute-level tolerances this engine
/// targets for the "true" ayanamsha correction.
pub fn nutation_iau2000b(t: f64) -> (f64, f64) {
    // Mean longitude of the Sun and Moon (degrees), and Omega from the
    // Delaunay arguments.
    let args = fundamental_arguments(t);
    let omega = args[4];

    let l_sun_deg = (280.466_45 + 36_000.769_83 * t).rem_euclid(360.0);
    let l_moon_deg = (218.316_54 + 481_267.881_34 * t).rem_euclid(360.0);

    let l_sun = l_sun_deg.to_radians();
    let l_moon = l_moon_deg.to_radians();

    let delta_psi = -17.20 * omega.sin() - 1.32 * (2.0 * l_sun).sin()
        - 0.23 * (2.0 * l_moon).sin()
        + 0.21 * (2.0 * omega).sin();

    let delta_eps = 9.20 * omega.cos() + 0.57 * (2.0 * l_sun).cos() + 0.10 * (2.0 * l_moon).cos()
        - 0.09 * (2.0 * omega).cos();

    (delta_psi, delta_eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fundamental_arguments_in_range() {
        for &t in &[-10.0, -1.0, 0.0, 1.0, 10.0] {
            for &a in &fundamental_arguments(t) {
                assert!((0.0..TAU).contains(&a), "t={t}: arg={a} out of range");
            }
        }
    }

    #[test]
    fn mean_node_at_j2000() {
        let args = fundamental_arguments(0.0);
        let omega_deg = args[4].to_degrees();
        assert!(
            (omega_deg - 125.04).abs() < 0.1,
            "Omega at J2000 = {omega_deg}, expected ~125.04"
        );
    }

    #[test]
    fn nutation_magnitude_bounded() {
        for &t in &[-2.0, -0.5, 0.0, 0.5, 2.0] {
            let (dpsi, deps) = nutation_iau2000b(t);
            assert!(dpsi.abs() < 20.0, "t={t}: delta_psi={dpsi}");
            assert!(deps.abs() < 10.0, "t={t}: delta_eps={deps}");
        }
    }

    #[test]
    fn nutation_at_j2000_matches_known_value() {
        // At J2000.0 (2000-01-01 12:00 TT), Omega ~= 125.04 deg, giving
        // delta_psi dominated by the -17.20*sin(Omega) term, close to -13.9".
        let (dpsi, _deps) = nutation_iau2000b(0.0);
        assert!(
            (dpsi - (-13.9)).abs() < 1.0,
            "delta_psi at J2000 = {dpsi}, expected ~-13.9"
        );
    }
}
