//! Error type for ayanamsha registry and lunar node lookups.

use std::fmt;

/// Errors from the ayanamsha and lunar-node helpers in this crate.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum VedicError {
    /// A named ayanamsha system was not recognized.
    UnknownSystem(String),
    /// A caller-supplied parameter was outside its valid range.
    InvalidInput(String),
    /// An ayanāṃśa registry override file was unreadable or malformed.
    InvalidRegistryFile(String),
}

impl fmt::Display for VedicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSystem(name) => write!(f, "unknown ayanamsha system: {name}"),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::InvalidRegistryFile(msg) => write!(f, "invalid ayanamsha registry file: {msg}"),
        }
    }
}

impl std::error::Error for VedicError {}
