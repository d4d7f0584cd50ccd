//! Process entry point: load configuration, verify and load the kernel
//! bundle, assemble `AppState`, and serve the `axum::Router` (§6.3).
//!
//! Exit codes: `0` normal shutdown, `1` startup failure (bad config,
//! missing/mismatched kernel bundle, unbindable address).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use dhruv_config::AppConfig;
use dhruv_core::{BundlePolicy, Engine, EngineConfig};
use dhruv_server::cache::{L2Cache, ResponseCache};
use dhruv_server::metrics::Metrics;
use dhruv_server::pool::WorkerPool;
use dhruv_server::ratelimit;
use dhruv_server::singleflight::SingleFlight;
use dhruv_server::state::AppState;
use dhruv_timezone::PatchRuleSet;
use dhruv_vedic_base::AyanamshaRegistry;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dhruv_server", about = "Astronomical positions compute service")]
struct Cli {
    /// Path to a TOML configuration file (optional; env vars and defaults
    /// apply on top when absent).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config = match dhruv_config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let runtime = tokio::runtime::Runtime::new().expect("failed to build tokio runtime");
    let exit_code = runtime.block_on(run(config));
    std::process::exit(exit_code);
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        dhruv_config::LogFormat::Json => subscriber.json().init(),
        dhruv_config::LogFormat::Text => subscriber.init(),
    }
}

async fn run(config: AppConfig) -> i32 {
    let config = Arc::new(config);

    let engine = match build_engine(&config) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            tracing::error!(error = %e, "failed to load kernel bundle at startup");
            return 1;
        }
    };

    let bundle_policy = BundlePolicy::from_name(&config.kernels.policy).unwrap_or(BundlePolicy::Auto);
    let de440_start_jd = parse_date_to_jd(&config.kernels.de440_start).unwrap_or(2_400_000.5);
    let de440_end_jd = parse_date_to_jd(&config.kernels.de440_end).unwrap_or(2_500_000.5);

    let ayanamsha_registry = Arc::new(build_ayanamsha_registry(&config));
    let patch_rules = Arc::new(build_patch_rules(&config));

    let l2 = if config.cache.redis.enabled {
        match L2Cache::new(&config.cache.redis.url, Duration::from_secs(config.cache.redis.ttl_seconds)) {
            Ok(l2) => Some(l2),
            Err(e) => {
                tracing::warn!(error = %e, "failed to construct L2 cache client; continuing L1-only");
                None
            }
        }
    } else {
        None
    };
    let cache = Arc::new(ResponseCache::new(
        config.cache.l1_size,
        Duration::from_secs(config.cache.ttl_seconds),
        l2,
    ));

    let pool = Arc::new(WorkerPool::new(config.api.workers, config.api.workers * 4));
    let rate_limiter = ratelimit::build(&config.ratelimit);
    let metrics = Arc::new(Metrics::new());
    let in_flight = Arc::new(SingleFlight::new());

    let state = Arc::new(AppState {
        engine,
        ayanamsha_registry,
        patch_rules,
        cache,
        pool,
        rate_limiter,
        metrics,
        in_flight,
        config: Arc::clone(&config),
        bundle_policy,
        de440_start_jd,
        de440_end_jd,
        rule_set_version: config.time.tzdb_version.clone(),
        request_deadline: Duration::from_secs(10),
    });

    let app = dhruv_server::build_router(Arc::clone(&state));

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr, "failed to bind");
            return 1;
        }
    };

    tracing::info!(addr = %config.bind_addr, "dhruv_server listening");
    let result = axum::serve(listener, app.into_make_service_with_connect_info::<std::net::SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = result {
        tracing::error!(error = %e, "server exited with error");
        return 1;
    }
    0
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

fn build_engine(config: &AppConfig) -> Result<Engine, String> {
    let bundle_dir = Path::new(&config.kernels.path).join(&config.kernels.bundle);

    let manifest_path = Path::new(&config.kernels.checksums_file);
    if manifest_path.as_os_str().is_empty() {
        return Err("kernels.checksums_file must be set".to_string());
    }
    let manifest_json = std::fs::read_to_string(manifest_path)
        .map_err(|e| format!("failed to read kernel manifest {}: {e}", manifest_path.display()))?;
    let manifest = dhruv_core::parse_manifest(&manifest_json).map_err(|e| format!("invalid kernel manifest: {e}"))?;
    dhruv_core::verify_bundle(&bundle_dir, &manifest).map_err(|e| format!("kernel bundle verification failed: {e}"))?;

    let mut spk_paths = Vec::new();
    let mut lsk_path = None;
    for rel_path in manifest.files.keys() {
        let full = bundle_dir.join(rel_path);
        if rel_path.ends_with(".bsp") {
            spk_paths.push(full);
        } else if rel_path.ends_with(".tls") {
            lsk_path = Some(full);
        }
    }
    let lsk_path = lsk_path.ok_or_else(|| "kernel bundle manifest has no .tls leap-second file".to_string())?;

    Engine::new(EngineConfig {
        spk_paths,
        lsk_path,
        cache_capacity: 4096,
        strict_validation: true,
    })
    .map_err(|e| e.to_string())
}

fn build_ayanamsha_registry(config: &AppConfig) -> AyanamshaRegistry {
    if config.ephemeris.ayanamsha_registry_file.is_empty() {
        return AyanamshaRegistry::default();
    }
    match AyanamshaRegistry::load(Path::new(&config.ephemeris.ayanamsha_registry_file)) {
        Ok(registry) => registry,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load ayanamsha registry override file; using built-in defaults");
            AyanamshaRegistry::default()
        }
    }
}

fn build_patch_rules(config: &AppConfig) -> PatchRuleSet {
    if config.time.patches_file.is_empty() {
        return PatchRuleSet::built_in_defaults();
    }
    match PatchRuleSet::load(Path::new(&config.time.patches_file)) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load time-resolver patch file; using built-in defaults");
            PatchRuleSet::built_in_defaults()
        }
    }
}

fn parse_date_to_jd(rfc3339: &str) -> Option<f64> {
    let dt: chrono::DateTime<chrono::Utc> = rfc3339.parse().ok()?;
    const JD_UNIX_EPOCH: f64 = 2_440_587.5;
    Some(JD_UNIX_EPOCH + dt.timestamp() as f64 / 86_400.0)
}
