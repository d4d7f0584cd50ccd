//! Time scale conversions: UTC <-> TAI <-> TT <-> TDB.
//!
//! TAI - UTC is the accumulated leap-second count from the LSK. TT is
//! defined as TAI + 32.184s exactly. TDB differs from TT by a small
//! periodic term (at most about 1.7 ms) driven by Earth's orbital
//! eccentricity; see Fairhead & Bretagnon (1990), adopted by NAIF as the
//! `DELTET/K`, `DELTET/EB`, `DELTET/M` formula in every LSK.

use crate::julian::SECONDS_PER_DAY;
use crate::lsk::LskData;

const TT_MINUS_TAI: f64 = 32.184;

/// Leap seconds (TAI - UTC) applicable at the given UTC instant, expressed
/// as a Julian Date (UTC).
fn leap_seconds_at_utc_jd(data: &LskData, jd_utc: f64) -> f64 {
    data.leap_seconds
        .iter()
        .rev()
        .find(|(_, effective_jd)| jd_utc >= *effective_jd)
        .map(|(delta, _)| *delta)
        .unwrap_or_else(|| data.leap_seconds.first().map(|(d, _)| *d).unwrap_or(0.0))
}

/// Leap seconds (TAI - TDB-ish) applicable at the given TAI-seconds-since-J2000
/// instant, found by converting back to an approximate UTC JD for table lookup.
fn leap_seconds_at_tai_seconds(data: &LskData, tai_seconds_j2000: f64) -> f64 {
    let approx_jd_utc = crate::julian::tdb_seconds_to_jd(tai_seconds_j2000);
    leap_seconds_at_utc_jd(data, approx_jd_utc)
}

/// Periodic TDB - TT correction, seconds, per the NAIF `DELTET/K` formula.
///
/// `tt_seconds_j2000` is seconds of TT since J2000.0 epoch (2000-01-01 12:00 TT).
fn tdb_minus_tt(data: &LskData, tt_seconds_j2000: f64) -> f64 {
    let (m0, m1) = data.m;
    let mean_anomaly = m0 + m1 * tt_seconds_j2000;
    data.k * (mean_anomaly + data.eb * mean_anomaly.sin()).sin()
}

/// Convert UTC (seconds since the J2000.0 epoch, i.e. `(jd_utc - 2451545.0) *
/// 86400`) to TDB seconds since J2000.0.
pub fn utc_to_tdb(utc_s: f64, data: &LskData) -> f64 {
    let jd_utc = utc_s / SECONDS_PER_DAY + crate::julian::J2000_JD;
    let leap = leap_seconds_at_utc_jd(data, jd_utc);

    let tai_s = utc_s + leap;
    let tt_s = tai_s + TT_MINUS_TAI;

    // The periodic term is small enough (<2ms) that evaluating it at TT
    // instead of iterating to TDB is within tolerance for this engine.
    tt_s + tdb_minus_tt(data, tt_s)
}

/// Convert TDB seconds since J2000.0 back to UTC seconds since J2000.0.
pub fn tdb_to_utc(tdb_s: f64, data: &LskData) -> f64 {
    let tt_s = tdb_s - tdb_minus_tt(data, tdb_s);
    let tai_s = tt_s - TT_MINUS_TAI;
    let leap = leap_seconds_at_tai_seconds(data, tai_s);
    tai_s - leap
}
