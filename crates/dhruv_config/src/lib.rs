//! Layered configuration resolution for the positions service.
//!
//! Configuration resolves in three layers, lowest to highest precedence:
//! code defaults, an optional TOML file, then environment variables.

pub mod error;
pub mod load;
pub mod model;

pub use error::ConfigError;
pub use load::load_config;
pub use model::{
    ApiConfig, AppConfig, CacheConfig, EphemerisConfig, FeaturesConfig, FixedStarsConfig,
    GeocodeConfig, KernelConfig, LogFormat, RateLimitConfig, RateLimitRule, RedisCacheConfig,
    TimeConfig,
};
