//! Process-wide shared state. Everything here is either immutable after
//! startup or internally synchronized; handlers only ever see `Arc<AppState>`.

use std::sync::Arc;
use std::time::Duration;

use dhruv_config::AppConfig;
use dhruv_core::{BundlePolicy, Engine};
use dhruv_timezone::PatchRuleSet;
use dhruv_vedic_base::AyanamshaRegistry;

use crate::cache::ResponseCache;
use crate::metrics::Metrics;
use crate::pool::WorkerPool;
use crate::ratelimit::RateLimiterService;
use crate::singleflight::SingleFlight;

pub struct AppState {
    pub engine: Arc<Engine>,
    pub ayanamsha_registry: Arc<AyanamshaRegistry>,
    pub patch_rules: Arc<PatchRuleSet>,
    pub cache: Arc<ResponseCache>,
    pub pool: Arc<WorkerPool>,
    pub rate_limiter: Arc<RateLimiterService>,
    pub metrics: Arc<Metrics>,
    pub in_flight: Arc<SingleFlight<Vec<u8>>>,
    pub config: Arc<AppConfig>,
    pub bundle_policy: BundlePolicy,
    pub de440_start_jd: f64,
    pub de440_end_jd: f64,
    pub rule_set_version: String,
    pub request_deadline: Duration,
}
