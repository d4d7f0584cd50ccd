use serde::{Deserialize, Serialize};

/// The fully-resolved, immutable configuration snapshot for one process.
///
/// Built by [`crate::load::load_config`] from three layers (code defaults,
/// an optional TOML file, environment variables); never mutated after
/// startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub kernels: KernelConfig,
    pub cache: CacheConfig,
    pub geocoding: GeocodeConfig,
    pub time: TimeConfig,
    pub ephemeris: EphemerisConfig,
    pub ratelimit: RateLimitConfig,
    pub features: FeaturesConfig,
    pub bind_addr: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            kernels: KernelConfig::default(),
            cache: CacheConfig::default(),
            geocoding: GeocodeConfig::default(),
            time: TimeConfig::default(),
            ephemeris: EphemerisConfig::default(),
            ratelimit: RateLimitConfig::default(),
            features: FeaturesConfig::default(),
            bind_addr: "0.0.0.0:8080".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub cors_origins: Vec<String>,
    pub rate_limit: String,
    pub workers: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            rate_limit: "200/minute".to_string(),
            workers: 4,
        }
    }
}

/// `policy` is `auto | de440 | de441`, matching [`dhruv_core::BundlePolicy`]
/// (this crate doesn't depend on `dhruv_core` directly to keep config
/// resolution free of the heavy kernel-loading dependency chain; the server
/// binary maps the string via `BundlePolicy::from_name`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub bundle: String,
    pub path: String,
    pub checksums_file: String,
    pub policy: String,
    pub de440_start: String,
    pub de440_end: String,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            bundle: "de440-1900".to_string(),
            path: "/opt/kernels".to_string(),
            checksums_file: "/opt/kernels/checksums.json".to_string(),
            policy: "auto".to_string(),
            de440_start: "1550-01-01T00:00:00Z".to_string(),
            de440_end: "2650-01-01T00:00:00Z".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisCacheConfig {
    pub enabled: bool,
    pub url: String,
    pub ttl_seconds: u64,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "redis://redis:6379/0".to_string(),
            ttl_seconds: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub l1_size: usize,
    pub ttl_seconds: u64,
    pub redis: RedisCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            l1_size: 2048,
            ttl_seconds: 3600,
            redis: RedisCacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://nominatim-nginx".to_string(),
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub tzdb_version: String,
    pub parity_profile_default: String,
    pub patches_file: String,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            tzdb_version: "2025.1".to_string(),
            parity_profile_default: "strict_history".to_string(),
            patches_file: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub key: String,
    pub limit: String,
}

impl Default for RateLimitRule {
    fn default() -> Self {
        Self {
            key: "ip".to_string(),
            limit: "200/minute".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub redis_url: String,
    pub rules: Vec<RateLimitRule>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            redis_url: "redis://redis:6379/1".to_string(),
            rules: vec![RateLimitRule::default()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EphemerisConfig {
    pub ayanamsha_registry_file: String,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            ayanamsha_registry_file: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedStarsConfig {
    pub enabled: bool,
    pub catalog: String,
    pub mag_limit: f64,
}

impl Default for FixedStarsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            catalog: "bsc5".to_string(),
            mag_limit: 2.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub fixed_stars: FixedStarsConfig,
}
