//! Token-bucket rate limiting, in-process by default with an optional
//! Redis-backed fixed window for multi-instance deployments.
//!
//! The Redis path fails open like [`crate::cache::l2::L2Cache`]: an
//! unreachable limiter never blocks a request, it just falls back to
//! allowing it while counting the failure (see DESIGN.md for why this,
//! rather than fail-closed, was chosen for rate limiting specifically).

use std::collections::HashMap;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use redis::AsyncCommands;
use tracing::warn;

use crate::metrics::Metrics;

pub struct RateLimitDecision {
    pub allowed: bool,
    pub retry_after_secs: u64,
    /// The rule's configured request ceiling, for `X-RateLimit-Limit`.
    pub limit: u32,
    /// Requests still permitted in the current window, for
    /// `X-RateLimit-Remaining`.
    pub remaining: u32,
    /// Seconds until the current window resets, for `X-RateLimit-Reset`.
    pub reset_secs: u64,
}

/// Parse a `"<count>/<unit>"` rule, e.g. `"200/minute"` or `"5/second"`.
pub fn parse_rule(rule: &str) -> Option<(u32, Duration)> {
    let (count_str, unit) = rule.split_once('/')?;
    let count: u32 = count_str.trim().parse().ok()?;
    let period = match unit.trim().to_ascii_lowercase().as_str() {
        "second" | "sec" | "s" => Duration::from_secs(1),
        "minute" | "min" | "m" => Duration::from_secs(60),
        "hour" | "h" => Duration::from_secs(3600),
        _ => return None,
    };
    Some((count, period))
}

enum Backend {
    InProcess {
        limiter: RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>,
        limit: u32,
        window_secs: u64,
        /// Per-IP fixed-window counters, kept purely to report
        /// `remaining`/`reset` alongside the governor-driven admission
        /// decision (governor's own state doesn't expose a remaining count).
        windows: Mutex<HashMap<IpAddr, (u64, u32)>>,
    },
    Redis { client: redis::Client, limit: u32, window_secs: u64 },
    Disabled,
}

pub struct RateLimiterService {
    backend: Backend,
}

impl RateLimiterService {
    pub fn disabled() -> Self {
        Self { backend: Backend::Disabled }
    }

    /// An in-process token bucket keyed by client IP.
    pub fn in_process(rule: &str) -> Self {
        let (count, period) = parse_rule(rule).unwrap_or((200, Duration::from_secs(60)));
        let quota = Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_minute(NonZeroU32::new(200).unwrap()))
            .allow_burst(NonZeroU32::new(count.max(1)).unwrap());
        Self {
            backend: Backend::InProcess {
                limiter: RateLimiter::dashmap(quota),
                limit: count.max(1),
                window_secs: period.as_secs().max(1),
                windows: Mutex::new(HashMap::new()),
            },
        }
    }

    /// A Redis-backed fixed window, for deployments running more than one
    /// server process behind a shared limit.
    pub fn redis_fixed_window(url: &str, rule: &str) -> Result<Self, redis::RedisError> {
        let (count, period) = parse_rule(rule).unwrap_or((200, Duration::from_secs(60)));
        let client = redis::Client::open(url)?;
        Ok(Self {
            backend: Backend::Redis { client, limit: count.max(1), window_secs: period.as_secs().max(1) },
        })
    }

    pub async fn check(&self, ip: IpAddr, metrics: &Metrics) -> RateLimitDecision {
        match &self.backend {
            Backend::Disabled => {
                RateLimitDecision { allowed: true, retry_after_secs: 0, limit: 0, remaining: 0, reset_secs: 0 }
            }
            Backend::InProcess { limiter, limit, window_secs, windows } => {
                let (window_idx, reset_secs) = current_window(*window_secs);
                let count = {
                    let mut map = windows.lock().unwrap();
                    let entry = map.entry(ip).or_insert((window_idx, 0));
                    if entry.0 != window_idx {
                        *entry = (window_idx, 0);
                    }
                    entry.1 += 1;
                    entry.1
                };

                match limiter.check_key(&ip) {
                    Ok(()) => RateLimitDecision {
                        allowed: true,
                        retry_after_secs: 0,
                        limit: *limit,
                        remaining: limit.saturating_sub(count),
                        reset_secs,
                    },
                    Err(not_until) => {
                        let wait = not_until.wait_time_from(DefaultClock::default().now());
                        RateLimitDecision {
                            allowed: false,
                            retry_after_secs: wait.as_secs().max(1),
                            limit: *limit,
                            remaining: 0,
                            reset_secs,
                        }
                    }
                }
            }
            Backend::Redis { client, limit, window_secs } => {
                self.check_redis(client, *limit, *window_secs, ip, metrics).await
            }
        }
    }

    async fn check_redis(
        &self,
        client: &redis::Client,
        limit: u32,
        window_secs: u64,
        ip: IpAddr,
        metrics: &Metrics,
    ) -> RateLimitDecision {
        let mut conn = match client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "rate limiter redis unreachable; failing open");
                metrics.record_error("RATELIMIT.BACKEND_UNAVAILABLE", "infrastructure");
                return RateLimitDecision { allowed: true, retry_after_secs: 0, limit, remaining: limit, reset_secs: 0 };
            }
        };

        // Fixed window: bucket key scoped to ip + current window index.
        let (window_index, reset_secs) = current_window(window_secs);
        let key = format!("ratelimit:{ip}:{window_index}");

        let count: Result<i64, redis::RedisError> = conn.incr(&key, 1).await;
        let count = match count {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "rate limiter redis INCR failed; failing open");
                metrics.record_error("RATELIMIT.BACKEND_UNAVAILABLE", "infrastructure");
                return RateLimitDecision { allowed: true, retry_after_secs: 0, limit, remaining: limit, reset_secs: 0 };
            }
        };
        if count == 1 {
            let _: Result<(), redis::RedisError> = conn.expire(&key, window_secs as i64).await;
        }

        if count as u64 <= limit as u64 {
            let remaining = limit.saturating_sub(count as u32);
            RateLimitDecision { allowed: true, retry_after_secs: 0, limit, remaining, reset_secs }
        } else {
            RateLimitDecision { allowed: false, retry_after_secs: reset_secs, limit, remaining: 0, reset_secs }
        }
    }
}

/// The current fixed window index for a `window_secs`-wide window, plus the
/// number of seconds remaining until it rolls over.
fn current_window(window_secs: u64) -> (u64, u64) {
    let now_secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let window_index = now_secs / window_secs;
    let reset_secs = (window_secs - (now_secs % window_secs)).max(1);
    (window_index, reset_secs)
}

/// Build a rate limiter from resolved config.
pub fn build(config: &dhruv_config::RateLimitConfig) -> Arc<RateLimiterService> {
    if !config.enabled {
        return Arc::new(RateLimiterService::disabled());
    }
    let rule = config.rules.first().map(|r| r.limit.as_str()).unwrap_or("200/minute");
    if !config.redis_url.is_empty() {
        match RateLimiterService::redis_fixed_window(&config.redis_url, rule) {
            Ok(service) => return Arc::new(service),
            Err(e) => warn!(error = %e, "failed to build redis rate limiter; falling back to in-process"),
        }
    }
    Arc::new(RateLimiterService::in_process(rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_rules() {
        assert_eq!(parse_rule("200/minute"), Some((200, Duration::from_secs(60))));
        assert_eq!(parse_rule("5/second"), Some((5, Duration::from_secs(1))));
        assert_eq!(parse_rule("garbage"), None);
    }

    #[tokio::test]
    async fn disabled_backend_always_allows() {
        let service = RateLimiterService::disabled();
        let metrics = Metrics::new();
        let ip: IpAddr = "127.0.0.1".parse().unwrap();
        for _ in 0..1000 {
            assert!(service.check(ip, &metrics).await.allowed);
        }
    }

    #[tokio::test]
    async fn in_process_bucket_rejects_past_burst() {
        let service = RateLimiterService::in_process("2/minute");
        let metrics = Metrics::new();
        let ip: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(service.check(ip, &metrics).await.allowed);
        assert!(service.check(ip, &metrics).await.allowed);
        let decision = service.check(ip, &metrics).await;
        assert!(!decision.allowed);
        assert!(decision.retry_after_secs >= 1);
    }

    #[tokio::test]
    async fn in_process_decision_reports_limit_and_remaining() {
        let service = RateLimiterService::in_process("2/minute");
        let metrics = Metrics::new();
        let ip: IpAddr = "10.0.0.2".parse().unwrap();

        let first = service.check(ip, &metrics).await;
        assert_eq!(first.limit, 2);
        assert_eq!(first.remaining, 1);
        assert!(first.reset_secs >= 1 && first.reset_secs <= 60);

        let second = service.check(ip, &metrics).await;
        assert_eq!(second.remaining, 0);

        let third = service.check(ip, &metrics).await;
        assert!(!third.allowed);
        assert_eq!(third.limit, 2);
        assert_eq!(third.remaining, 0);
    }
}
