//! Typed query engine over one or more loaded SPK ephemeris kernels.
//!
//! This crate plays the "ephemeris compute primitive" role in the
//! surrounding service: it owns kernel state, resolves body codes to
//! barycentric state vectors, and converts them into the reference frame
//! a caller asked for. It has no knowledge of HTTP, caching, or workers —
//! those live in `dhruv_server`, which treats an [`Engine`] as the opaque,
//! CPU-bound primitive each worker task owns exclusively.

pub mod body;
pub mod bundle;
pub mod engine;
pub mod error;

pub use body::Body;
pub use bundle::{BundlePolicy, KernelManifest, bundle_tag_for_policy, parse_manifest, verify_bundle};
pub use engine::{Engine, EngineConfig, Frame, Observer, Query, QueryResult};
pub use error::EngineError;
