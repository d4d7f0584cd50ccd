use thiserror::Error;

/// Errors raised while resolving an [`crate::AppConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in config file {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}
