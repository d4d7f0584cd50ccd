//! HTTP serving plane for the positions compute service (§4.E): the
//! Orchestrator, two-tier cache, single-flight coalescing, worker pool, rate
//! limiter and Prometheus metrics, assembled behind an `axum::Router`.
//!
//! Dependency direction is strict: the Orchestrator depends on the
//! Resolver, Pool, Cache and Ayanāṃśa registry; none of those depend back
//! on it (§9). `routes` is the only module that depends on `orchestrator`.

pub mod cache;
pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod metrics;
pub mod orchestrator;
pub mod pool;
pub mod ratelimit;
pub mod routes;
pub mod singleflight;
pub mod state;
pub mod timeresolve;

pub use routes::build_router;
pub use state::AppState;
