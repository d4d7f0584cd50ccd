//! L2: an optional, distributed cache backed by Redis. Unreachable L2
//! must **fail open** — every method here returns `None`/`Ok(())` on any
//! connection or protocol error rather than propagating it, and bumps the
//! `involution_errors_total{code="CACHE.L2_UNAVAILABLE"}` counter via the
//! caller-supplied metrics handle.

use std::time::Duration;

use redis::AsyncCommands;
use tracing::warn;

use crate::metrics::Metrics;

pub struct L2Cache {
    client: redis::Client,
    ttl: Duration,
}

impl L2Cache {
    pub fn new(url: &str, ttl: Duration) -> Result<Self, redis::RedisError> {
        Ok(Self { client: redis::Client::open(url)?, ttl })
    }

    pub async fn get(&self, key: &str, metrics: &Metrics) -> Option<Vec<u8>> {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "L2 cache unreachable on get; failing open");
                metrics.record_error("CACHE.L2_UNAVAILABLE", "infrastructure");
                return None;
            }
        };
        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "L2 cache read failed; failing open");
                metrics.record_error("CACHE.L2_UNAVAILABLE", "infrastructure");
                None
            }
        }
    }

    /// Write-through, best-effort: failures are logged and metered, never
    /// surfaced to the caller.
    pub async fn set(&self, key: &str, value: &[u8], metrics: &Metrics) {
        let mut conn = match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "L2 cache unreachable on set; failing open");
                metrics.record_error("CACHE.L2_UNAVAILABLE", "infrastructure");
                return;
            }
        };
        let ttl_secs = self.ttl.as_secs();
        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, ttl_secs).await {
            warn!(error = %e, "L2 cache write failed; failing open");
            metrics.record_error("CACHE.L2_UNAVAILABLE", "infrastructure");
        }
    }

    /// A cheap reachability probe for `/healthz`.
    pub async fn ping(&self) -> bool {
        match self.client.get_multiplexed_async_connection().await {
            Ok(mut conn) => redis::cmd("PING").query_async::<_, String>(&mut conn).await.is_ok(),
            Err(_) => false,
        }
    }
}
