use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::model::{AppConfig, LogFormat, RateLimitRule};

/// Resolve an [`AppConfig`], lowest to highest precedence:
///
/// 1. [`AppConfig::default`] field defaults defined in code.
/// 2. An optional TOML file at `explicit_path`, or else `$CONFIG_FILE`, or
///    else `./config.toml` if present. A missing file at the resolved path
///    is not an error — the defaults are used as-is.
/// 3. Environment variables, applied last so they always win.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = explicit_path
        .map(PathBuf::from)
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let mut config = if path.exists() {
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.display().to_string(),
            source,
        })?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) -> Result<(), ConfigError> {
    if let Ok(v) = std::env::var("KERNEL_BUNDLE") {
        config.kernels.bundle = v;
    }
    if let Ok(v) = std::env::var("KERNELS_PATH") {
        config.kernels.path = v;
    }
    if let Ok(v) = std::env::var("WORKERS") {
        config.api.workers = parse_env("WORKERS", &v)?;
    }
    if let Ok(v) = std::env::var("CACHE_L1_SIZE") {
        config.cache.l1_size = parse_env("CACHE_L1_SIZE", &v)?;
    }
    if let Ok(v) = std::env::var("CACHE_TTL_SECONDS") {
        config.cache.ttl_seconds = parse_env("CACHE_TTL_SECONDS", &v)?;
    }
    if let Ok(v) = std::env::var("CACHE_L2_URL") {
        config.cache.redis.url = v;
    }
    if let Ok(v) = std::env::var("CACHE_L2_ENABLED") {
        config.cache.redis.enabled = parse_bool_env("CACHE_L2_ENABLED", &v)?;
    }
    if let Ok(v) = std::env::var("RATELIMIT_ENABLED") {
        config.ratelimit.enabled = parse_bool_env("RATELIMIT_ENABLED", &v)?;
    }
    if let Ok(v) = std::env::var("RATELIMIT_RULE") {
        match config.ratelimit.rules.first_mut() {
            Some(rule) => rule.limit = v,
            None => config.ratelimit.rules.push(RateLimitRule {
                key: "ip".to_string(),
                limit: v,
            }),
        }
    }
    if let Ok(v) = std::env::var("TIME_RESOLVER_PATCHES") {
        config.time.patches_file = v;
    }
    if let Ok(v) = std::env::var("AYANAMSHA_REGISTRY") {
        config.ephemeris.ayanamsha_registry_file = v;
    }
    if let Ok(v) = std::env::var("PARITY_PROFILE_DEFAULT") {
        config.time.parity_profile_default = v;
    }
    if let Ok(v) = std::env::var("BIND_ADDR") {
        config.bind_addr = v;
    }
    if let Ok(v) = std::env::var("LOG_FORMAT") {
        config.log_format = match v.to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::InvalidValue {
                    field: "LOG_FORMAT",
                    value: v,
                });
            }
        };
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn parse_bool_env(field: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests mutate process environment, so serialize them against each other
    // and against any other test in this crate doing the same.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_all() {
        for key in [
            "CONFIG_FILE",
            "KERNEL_BUNDLE",
            "KERNELS_PATH",
            "WORKERS",
            "CACHE_L1_SIZE",
            "CACHE_TTL_SECONDS",
            "CACHE_L2_URL",
            "CACHE_L2_ENABLED",
            "RATELIMIT_ENABLED",
            "RATELIMIT_RULE",
            "TIME_RESOLVER_PATCHES",
            "AYANAMSHA_REGISTRY",
            "PARITY_PROFILE_DEFAULT",
            "BIND_ADDR",
            "LOG_FORMAT",
        ] {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    fn defaults_when_no_file_and_no_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        let config = load_config(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.api.workers, 4);
        assert_eq!(config.kernels.bundle, "de440-1900");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn env_vars_override_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        unsafe {
            std::env::set_var("WORKERS", "16");
            std::env::set_var("KERNEL_BUNDLE", "de441");
            std::env::set_var("BIND_ADDR", "127.0.0.1:9090");
            std::env::set_var("LOG_FORMAT", "json");
        }
        let config = load_config(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config.api.workers, 16);
        assert_eq!(config.kernels.bundle, "de441");
        assert_eq!(config.bind_addr, "127.0.0.1:9090");
        assert_eq!(config.log_format, LogFormat::Json);
        clear_all();
    }

    #[test]
    fn invalid_bool_env_is_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        unsafe { std::env::set_var("CACHE_L2_ENABLED", "maybe") };
        let err = load_config(Some(Path::new("/nonexistent/config.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "CACHE_L2_ENABLED", .. }));
        clear_all();
    }

    #[test]
    fn file_layer_overrides_defaults_but_not_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_all();
        let dir = std::env::temp_dir().join(format!("dhruv_config_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("config.toml");
        std::fs::write(&file, "[api]\nworkers = 8\n").unwrap();

        unsafe { std::env::set_var("WORKERS", "32") };
        let config = load_config(Some(&file)).unwrap();
        assert_eq!(config.api.workers, 32, "env var should win over file");

        clear_all();
        let config = load_config(Some(&file)).unwrap();
        assert_eq!(config.api.workers, 8, "file should win over default");

        std::fs::remove_dir_all(&dir).ok();
    }
}
