//! The query engine: a typed façade over one or more loaded SPK kernels.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Mutex;

use dhruv_frames::{
    PrecessionModel, cartesian_state_to_spherical_state, icrf_to_ecliptic, precess_ecliptic_j2000_to_date_with_model,
};
use dhruv_time::{J2000_JD, LeapSecondKernel};
use dhruv_vedic_base::{LunarNode, NodeMode, lunar_node_deg};
use jpl_kernel::SpkKernel;
use lru::LruCache;

use crate::body::Body;
use crate::error::EngineError;

const KM_PER_AU: f64 = 149_597_870.7;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// The reference frame a query result is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    /// ICRF, equatorial, referred to J2000 (the native DE-kernel frame).
    IcrfJ2000,
    /// Mean ecliptic and equinox of J2000.
    EclipticJ2000,
    /// Mean ecliptic and equinox of date (precessed from J2000).
    EclipticOfDate,
    /// Equatorial, referred to J2000 (right ascension / declination).
    Equatorial,
}

/// The body a query's position is expressed relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Observer {
    SolarSystemBarycenter,
    Body(Body),
}

/// A single position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub target: Body,
    pub observer: Observer,
    pub frame: Frame,
    /// TDB Julian Date.
    pub epoch_tdb_jd: f64,
}

/// A computed position, in spherical coordinates plus rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryResult {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub distance_au: f64,
    pub lon_rate_deg_per_day: f64,
    pub lat_rate_deg_per_day: f64,
    pub distance_rate_au_per_day: f64,
}

impl QueryResult {
    /// True when the body's apparent motion is retrograde (longitude
    /// decreasing with time).
    pub fn is_retrograde(&self) -> bool {
        self.lon_rate_deg_per_day < 0.0
    }
}

/// Configuration for constructing an [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub spk_paths: Vec<PathBuf>,
    pub lsk_path: PathBuf,
    pub cache_capacity: usize,
    /// When true, checksum-verify the kernel bundle manifest before
    /// loading (see [`crate::bundle`]). Disabled for tests against ad-hoc
    /// kernel files with no accompanying manifest.
    pub strict_validation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    target: i32,
    observer: i32,
    frame: Frame,
    epoch_bits: u64,
}

/// A loaded query engine: owns one or more SPK kernels and a leap-second
/// kernel, and answers [`Query`]s against them.
///
/// `Engine` is `Send + Sync`: kernels are read-only after load, and the
/// per-query result cache is protected by a `Mutex` with an O(1) critical
/// section, so an `Arc<Engine>` may be shared freely across worker tasks.
pub struct Engine {
    kernels: Vec<SpkKernel>,
    lsk: LeapSecondKernel,
    cache: Mutex<LruCache<CacheKey, QueryResult>>,
}

impl Engine {
    /// Load all configured kernels and build a ready-to-query engine.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let mut kernels = Vec::with_capacity(config.spk_paths.len());
        for path in &config.spk_paths {
            kernels.push(SpkKernel::load(path)?);
        }

        let lsk = LeapSecondKernel::load(&config.lsk_path)
            .map_err(|e| EngineError::Time(e.to_string()))?;

        let capacity = NonZeroUsize::new(config.cache_capacity.max(1)).unwrap();

        Ok(Self {
            kernels,
            lsk,
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Access the loaded leap-second kernel (used by callers needing
    /// UTC/TDB conversions alongside position queries).
    pub fn leap_second_kernel(&self) -> &LeapSecondKernel {
        &self.lsk
    }

    fn center_for(&self, code: i32) -> Option<i32> {
        self.kernels.iter().find_map(|k| k.center_for(code))
    }

    fn evaluate(
        &self,
        target: i32,
        center: i32,
        epoch_tdb_s: f64,
    ) -> Result<jpl_kernel::SpkEvaluation, EngineError> {
        let mut last_err = None;
        for kernel in &self.kernels {
            match kernel.evaluate(target, center, epoch_tdb_s) {
                Ok(eval) => return Ok(eval),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err
            .map(EngineError::from)
            .unwrap_or(EngineError::EpochOutsideCoverage {
                body: "unknown",
                epoch_tdb_jd: dhruv_time::tdb_seconds_to_jd(epoch_tdb_s),
            }))
    }

    /// Resolve a NAIF body code to a state vector relative to the solar
    /// system barycenter, in km and km/day.
    fn resolve_to_ssb(&self, body_code: i32, epoch_tdb_s: f64) -> Result<[f64; 6], EngineError> {
        let mut code = body_code;
        let mut state = [0.0f64; 6];

        while code != 0 {
            let center = match self.center_for(code) {
                Some(c) => c,
                None => {
                    let bary = jpl_kernel::planet_body_to_barycenter(code);
                    if bary != code {
                        code = bary;
                        continue;
                    }
                    return Err(EngineError::Kernel(jpl_kernel::KernelError::SegmentNotFound {
                        target: code,
                        center: -1,
                    }));
                }
            };

            let eval = self.evaluate(code, center, epoch_tdb_s)?;
            state[0] += eval.position_km[0];
            state[1] += eval.position_km[1];
            state[2] += eval.position_km[2];
            state[3] += eval.velocity_km_s[0];
            state[4] += eval.velocity_km_s[1];
            state[5] += eval.velocity_km_s[2];

            code = center;
        }

        Ok(state)
    }

    fn ssb_state(&self, body: Body, epoch_tdb_s: f64, epoch_tdb_jd: f64) -> Result<[f64; 6], EngineError> {
        if let Some(code) = body.naif_code() {
            return self.resolve_to_ssb(code, epoch_tdb_s);
        }

        // Lunar nodes: geocentric, zero-distance directional points. Compute
        // their ecliptic longitude from the lunar-node formulas and report
        // them as lying on the ecliptic (latitude 0) at unit distance, added
        // to Earth's SSB-relative position so the same "target - observer"
        // subtraction downstream recovers the correct geocentric longitude.
        let t_centuries = dhruv_vedic_base::jd_tdb_to_centuries(epoch_tdb_jd);
        let mode = if matches!(body, Body::TrueNode) {
            NodeMode::True
        } else {
            NodeMode::Mean
        };
        let lon_deg = lunar_node_deg(LunarNode::Rahu, t_centuries, mode);
        let lon_rad = lon_deg.to_radians();

        let earth = self.resolve_to_ssb(399, epoch_tdb_s)?;
        let ecliptic_dir = [lon_rad.cos(), lon_rad.sin(), 0.0];
        let icrf_dir = dhruv_frames::ecliptic_to_icrf(&ecliptic_dir);

        Ok([
            earth[0] + icrf_dir[0],
            earth[1] + icrf_dir[1],
            earth[2] + icrf_dir[2],
            earth[3],
            earth[4],
            earth[5],
        ])
    }

    fn observer_ssb_state(
        &self,
        observer: Observer,
        epoch_tdb_s: f64,
        epoch_tdb_jd: f64,
    ) -> Result<[f64; 6], EngineError> {
        match observer {
            Observer::SolarSystemBarycenter => Ok([0.0; 6]),
            Observer::Body(b) => self.ssb_state(b, epoch_tdb_s, epoch_tdb_jd),
        }
    }

    /// Answer a single query.
    pub fn query(&self, query: Query) -> Result<QueryResult, EngineError> {
        let key = CacheKey {
            target: query.target.naif_code().unwrap_or(-1),
            observer: match query.observer {
                Observer::SolarSystemBarycenter => 0,
                Observer::Body(b) => b.naif_code().unwrap_or(-1),
            },
            frame: query.frame,
            epoch_bits: query.epoch_tdb_jd.to_bits(),
        };

        if let Some(hit) = self.cache.lock().unwrap().get(&key) {
            return Ok(*hit);
        }

        let result = self.compute(query)?;
        self.cache.lock().unwrap().put(key, result);
        Ok(result)
    }

    /// Answer several queries, sharing no state beyond this engine's cache.
    pub fn query_batch(&self, queries: &[Query]) -> Vec<Result<QueryResult, EngineError>> {
        queries.iter().map(|&q| self.query(q)).collect()
    }

    fn compute(&self, query: Query) -> Result<QueryResult, EngineError> {
        let epoch_tdb_s = dhruv_time::jd_to_tdb_seconds(query.epoch_tdb_jd);

        let target_state = self.ssb_state(query.target, epoch_tdb_s, query.epoch_tdb_jd)?;
        let observer_state = self.observer_ssb_state(query.observer, epoch_tdb_s, query.epoch_tdb_jd)?;

        // Relative state, observer -> target, km and km/s.
        let rel_pos = [
            target_state[0] - observer_state[0],
            target_state[1] - observer_state[1],
            target_state[2] - observer_state[2],
        ];
        let rel_vel_per_s = [
            target_state[3] - observer_state[3],
            target_state[4] - observer_state[4],
            target_state[5] - observer_state[5],
        ];
        // Scale velocity to km/day so spherical rates come out per-day directly.
        let rel_vel_per_day = [
            rel_vel_per_s[0] * SECONDS_PER_DAY,
            rel_vel_per_s[1] * SECONDS_PER_DAY,
            rel_vel_per_s[2] * SECONDS_PER_DAY,
        ];

        let (pos, vel) = match query.frame {
            Frame::IcrfJ2000 | Frame::Equatorial => (rel_pos, rel_vel_per_day),
            Frame::EclipticJ2000 => (
                icrf_to_ecliptic(&rel_pos),
                icrf_to_ecliptic(&rel_vel_per_day),
            ),
            Frame::EclipticOfDate => {
                let ecl_pos = icrf_to_ecliptic(&rel_pos);
                let ecl_vel = icrf_to_ecliptic(&rel_vel_per_day);
                let t_centuries = (query.epoch_tdb_jd - J2000_JD) / 36_525.0;
                (
                    precess_ecliptic_j2000_to_date_with_model(
                        &ecl_pos,
                        t_centuries,
                        PrecessionModel::Vondrak2011,
                    ),
                    precess_ecliptic_j2000_to_date_with_model(
                        &ecl_vel,
                        t_centuries,
                        PrecessionModel::Vondrak2011,
                    ),
                )
            }
        };

        let state = cartesian_state_to_spherical_state(&pos, &vel);

        Ok(QueryResult {
            lon_deg: state.coords.lon_deg(),
            lat_deg: state.coords.lat_deg(),
            distance_au: state.coords.distance_km / KM_PER_AU,
            lon_rate_deg_per_day: state.lon_rate_deg(),
            lat_rate_deg_per_day: state.lat_rate_rad.to_degrees(),
            distance_rate_au_per_day: state.distance_rate_km / KM_PER_AU,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retrograde_flag_follows_lon_rate_sign() {
        let prograde = QueryResult {
            lon_deg: 10.0,
            lat_deg: 0.0,
            distance_au: 1.0,
            lon_rate_deg_per_day: 0.5,
            lat_rate_deg_per_day: 0.0,
            distance_rate_au_per_day: 0.0,
        };
        let retrograde = QueryResult {
            lon_rate_deg_per_day: -0.2,
            ..prograde
        };
        assert!(!prograde.is_retrograde());
        assert!(retrograde.is_retrograde());
    }
}
