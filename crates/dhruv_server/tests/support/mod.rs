//! Shared fixtures for the HTTP integration tests: a synthetic two-segment
//! SPK kernel (Sun and Earth, each a single-coefficient Type 2 Chebyshev
//! segment centered on the solar system barycenter) and a minimal LSK text
//! kernel, both written to real files so the tests drive the actual
//! `dhruv_core::Engine` loading path rather than a mock.
//!
//! A single Chebyshev coefficient makes the evaluated position constant for
//! any epoch inside the segment's declared coverage window, which keeps the
//! expected positions in the tests exact without needing real DE ephemeris
//! data.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use dhruv_config::AppConfig;
use dhruv_core::{BundlePolicy, Engine, EngineConfig};
use dhruv_server::cache::ResponseCache;
use dhruv_server::metrics::Metrics;
use dhruv_server::pool::WorkerPool;
use dhruv_server::ratelimit::RateLimiterService;
use dhruv_server::singleflight::SingleFlight;
use dhruv_server::state::AppState;
use dhruv_timezone::PatchRuleSet;
use dhruv_vedic_base::AyanamshaRegistry;

/// Coverage window of the synthetic kernel, TDB seconds past J2000.0.
/// About +/- 317 years around J2000 — comfortably covers any present-day
/// test epoch while still being easy to step outside of deliberately.
const COVERAGE_HALF_WIDTH_S: f64 = 1.0e10;

struct SyntheticSegment {
    target: i32,
    center: i32,
    position_km: [f64; 3],
}

/// Build a minimal, valid DAF/SPK binary kernel with one Type 2 segment per
/// entry in `segments`. Byte layout follows the NAIF DAF/SPK Required
/// Reading: a 1024-byte file record, one summary record holding every
/// segment's descriptor, then each segment's single-record Chebyshev data
/// followed by its trailing `(INIT, INTLEN, RSIZE, N)` descriptor.
fn build_synthetic_spk(segments: &[SyntheticSegment]) -> Vec<u8> {
    const RECORD_BYTES: usize = 1024;
    const WORDS_PER_SEGMENT: i32 = 9; // MID, RADIUS, 3x1 coeff, + 4-double descriptor

    let n = segments.len();
    let total_bytes = 2 * RECORD_BYTES + n * (WORDS_PER_SEGMENT as usize) * 8;
    let mut file = vec![0u8; total_bytes];

    file[0..8].copy_from_slice(b"DAF/SPK ");
    file[8..12].copy_from_slice(&2i32.to_le_bytes()); // ND
    file[12..16].copy_from_slice(&6i32.to_le_bytes()); // NI
    file[76..80].copy_from_slice(&2i32.to_le_bytes()); // FWARD: summary record 2
    file[80..84].copy_from_slice(&2i32.to_le_bytes()); // BWARD
    file[88..96].copy_from_slice(b"LTL-IEEE");

    let rec_off = RECORD_BYTES;
    file[rec_off..rec_off + 8].copy_from_slice(&0.0f64.to_le_bytes()); // NEXT: no more records
    file[rec_off + 8..rec_off + 16].copy_from_slice(&0.0f64.to_le_bytes()); // PREV
    file[rec_off + 16..rec_off + 24].copy_from_slice(&(n as f64).to_le_bytes()); // NSUM

    // First word of segment data is right after the two header records.
    let mut next_start_word = (2 * RECORD_BYTES / 8) as i32 + 1;
    let mut addrs = Vec::with_capacity(n);
    for _ in segments {
        let start_addr = next_start_word;
        let end_addr = start_addr + WORDS_PER_SEGMENT - 1;
        addrs.push((start_addr, end_addr));
        next_start_word = end_addr + 1;
    }

    for (i, (seg, (start_addr, end_addr))) in segments.iter().zip(addrs.iter()).enumerate() {
        let sum_off = rec_off + 24 + i * 40;
        file[sum_off..sum_off + 8].copy_from_slice(&(-COVERAGE_HALF_WIDTH_S).to_le_bytes());
        file[sum_off + 8..sum_off + 16].copy_from_slice(&COVERAGE_HALF_WIDTH_S.to_le_bytes());
        let int_base = sum_off + 16;
        file[int_base..int_base + 4].copy_from_slice(&seg.target.to_le_bytes());
        file[int_base + 4..int_base + 8].copy_from_slice(&seg.center.to_le_bytes());
        file[int_base + 8..int_base + 12].copy_from_slice(&1i32.to_le_bytes()); // frame
        file[int_base + 12..int_base + 16].copy_from_slice(&2i32.to_le_bytes()); // data_type
        file[int_base + 16..int_base + 20].copy_from_slice(&start_addr.to_le_bytes());
        file[int_base + 20..int_base + 24].copy_from_slice(&end_addr.to_le_bytes());
    }

    for (seg, (start_addr, _)) in segments.iter().zip(addrs.iter()) {
        let mut off = (*start_addr as usize - 1) * 8;
        file[off..off + 8].copy_from_slice(&0.0f64.to_le_bytes()); // MID
        off += 8;
        file[off..off + 8].copy_from_slice(&1.0f64.to_le_bytes()); // RADIUS
        off += 8;
        for axis in 0..3 {
            file[off..off + 8].copy_from_slice(&seg.position_km[axis].to_le_bytes());
            off += 8;
        }
        file[off..off + 8].copy_from_slice(&0.0f64.to_le_bytes()); // INIT
        off += 8;
        file[off..off + 8].copy_from_slice(&(2.0 * COVERAGE_HALF_WIDTH_S).to_le_bytes()); // INTLEN
        off += 8;
        file[off..off + 8].copy_from_slice(&5.0f64.to_le_bytes()); // RSIZE: 2 + 3*1
        off += 8;
        file[off..off + 8].copy_from_slice(&1.0f64.to_le_bytes()); // N: one record
    }

    file
}

const SYNTHETIC_LSK: &str = "DELTET/DELTA_AT = ( 10, @1972-JAN-1 37, @2017-JAN-1 )\n";

pub struct TestEnv {
    pub state: Arc<AppState>,
    kernel_dir: PathBuf,
}

impl TestEnv {
    pub fn router(&self) -> Router {
        dhruv_server::build_router(Arc::clone(&self.state))
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.kernel_dir);
    }
}

/// Construct a real `AppState` backed by the synthetic kernel: Sun at the
/// barycenter origin, Earth one AU away along the ICRF x-axis, so the Sun
/// as seen from Earth sits at ecliptic longitude 180 degrees (ecliptic
/// rotation is about the x-axis, so a pure-x vector is unchanged by it) at
/// a distance of almost exactly one AU, for any instant in the coverage
/// window.
pub fn build_test_state() -> TestEnv {
    static NEXT_ID: AtomicU64 = AtomicU64::new(0);
    let unique = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("dhruv_server_test_{}_{unique}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp kernel dir");

    let spk_path = dir.join("synthetic.bsp");
    let lsk_path = dir.join("synthetic.tls");

    let spk_bytes = build_synthetic_spk(&[
        SyntheticSegment { target: 10, center: 0, position_km: [0.0, 0.0, 0.0] },
        SyntheticSegment { target: 399, center: 0, position_km: [149_597_870.7, 0.0, 0.0] },
    ]);
    std::fs::write(&spk_path, spk_bytes).expect("write synthetic spk");
    std::fs::write(&lsk_path, SYNTHETIC_LSK).expect("write synthetic lsk");

    let engine = Engine::new(EngineConfig {
        spk_paths: vec![spk_path],
        lsk_path,
        cache_capacity: 64,
        strict_validation: false,
    })
    .expect("synthetic engine loads");

    let state = Arc::new(AppState {
        engine: Arc::new(engine),
        ayanamsha_registry: Arc::new(AyanamshaRegistry::default()),
        patch_rules: Arc::new(PatchRuleSet::built_in_defaults()),
        cache: Arc::new(ResponseCache::new(128, Duration::from_secs(60), None)),
        pool: Arc::new(WorkerPool::new(2, 8)),
        rate_limiter: Arc::new(RateLimiterService::disabled()),
        metrics: Arc::new(Metrics::new()),
        in_flight: Arc::new(SingleFlight::new()),
        config: Arc::new(AppConfig::default()),
        bundle_policy: BundlePolicy::Auto,
        de440_start_jd: 2_400_000.5,
        de440_end_jd: 2_500_000.5,
        rule_set_version: "test-2025.1".to_string(),
        request_deadline: Duration::from_secs(5),
    });

    TestEnv { state, kernel_dir: dir }
}

/// A fixed peer address for tests that bypass `into_make_service_with_connect_info`
/// and so must supply `ConnectInfo` by hand.
pub const TEST_PEER_ADDR: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)), 54321);
