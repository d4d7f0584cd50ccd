//! Error type for the query engine.

use std::fmt;

use jpl_kernel::KernelError;

/// Errors produced while building or querying an [`crate::Engine`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EngineError {
    /// A kernel file failed to load or parse.
    Kernel(KernelError),
    /// A leap-second kernel failed to load or parse.
    Time(String),
    /// The requested epoch falls outside every loaded kernel's coverage.
    EpochOutsideCoverage { body: &'static str, epoch_tdb_jd: f64 },
    /// The manifest checksum for a bundle file did not match.
    ChecksumMismatch { file: String },
    /// A file listed in the manifest was not found on disk.
    MissingFile { file: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kernel(e) => write!(f, "kernel error: {e}"),
            Self::Time(msg) => write!(f, "time error: {msg}"),
            Self::EpochOutsideCoverage { body, epoch_tdb_jd } => write!(
                f,
                "epoch {epoch_tdb_jd} (JD TDB) is outside kernel coverage for {body}"
            ),
            Self::ChecksumMismatch { file } => {
                write!(f, "checksum mismatch for kernel bundle file: {file}")
            }
            Self::MissingFile { file } => {
                write!(f, "kernel bundle file not found: {file}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<KernelError> for EngineError {
    fn from(e: KernelError) -> Self {
        Self::Kernel(e)
    }
}
