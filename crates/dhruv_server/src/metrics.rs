//! Prometheus metrics (§6.1's `GET /metrics`).
//!
//! Each counter/histogram/gauge is owned by `Metrics` and registered into a
//! caller-supplied `Registry` at construction time rather than stashed in a
//! global singleton, per the "avoid singletons" design note.

use prometheus::{
    CounterVec, GaugeVec, HistogramVec, Registry, opts, histogram_opts,
};

pub struct Metrics {
    registry: Registry,
    http_requests_total: CounterVec,
    positions_calculated_total: CounterVec,
    cache_operations_total: CounterVec,
    errors_total: CounterVec,
    worker_tasks_total: CounterVec,
    kernel_verifications_total: CounterVec,
    http_request_duration_seconds: HistogramVec,
    positions_duration_seconds: HistogramVec,
    worker_pool_size: GaugeVec,
    worker_pool_queue_size: GaugeVec,
    cache_size_entries: GaugeVec,
    cache_hit_rate: GaugeVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            opts!("http_requests_total", "Total HTTP requests served"),
            &["method", "endpoint", "status"],
        )
        .unwrap();
        let positions_calculated_total = CounterVec::new(
            opts!("involution_positions_calculated_total", "Positions computed"),
            &["system", "bundle_tag", "cache"],
        )
        .unwrap();
        let cache_operations_total = CounterVec::new(
            opts!("involution_cache_operations_total", "Cache operations"),
            &["op"],
        )
        .unwrap();
        let errors_total = CounterVec::new(
            opts!("involution_errors_total", "Errors by taxonomy code"),
            &["code", "category"],
        )
        .unwrap();
        let worker_tasks_total = CounterVec::new(
            opts!("involution_worker_tasks_total", "Worker pool tasks by outcome"),
            &["status"],
        )
        .unwrap();
        let kernel_verifications_total = CounterVec::new(
            opts!("involution_kernel_verifications_total", "Kernel bundle verifications"),
            &["valid"],
        )
        .unwrap();

        let http_request_duration_seconds = HistogramVec::new(
            histogram_opts!("http_request_duration_seconds", "HTTP request latency"),
            &["endpoint"],
        )
        .unwrap();
        let positions_duration_seconds = HistogramVec::new(
            histogram_opts!("involution_positions_duration_seconds", "Positions compute latency"),
            &["system"],
        )
        .unwrap();

        let worker_pool_size = GaugeVec::new(
            opts!("involution_worker_pool_size", "Configured worker pool size"),
            &["pool"],
        )
        .unwrap();
        let worker_pool_queue_size = GaugeVec::new(
            opts!("involution_worker_pool_queue_size", "Current worker pool queue depth"),
            &["pool"],
        )
        .unwrap();
        let cache_size_entries = GaugeVec::new(
            opts!("involution_cache_size_entries", "Entries currently cached"),
            &["tier"],
        )
        .unwrap();
        let cache_hit_rate = GaugeVec::new(
            opts!("involution_cache_hit_rate", "Cache hit rate in [0,1]"),
            &["tier"],
        )
        .unwrap();

        for c in [
            &http_requests_total,
            &positions_calculated_total,
            &cache_operations_total,
            &errors_total,
            &worker_tasks_total,
            &kernel_verifications_total,
        ] {
            registry.register(Box::new(c.clone())).unwrap();
        }
        for h in [&http_request_duration_seconds, &positions_duration_seconds] {
            registry.register(Box::new(h.clone())).unwrap();
        }
        for g in [
            &worker_pool_size,
            &worker_pool_queue_size,
            &cache_size_entries,
            &cache_hit_rate,
        ] {
            registry.register(Box::new(g.clone())).unwrap();
        }

        Self {
            registry,
            http_requests_total,
            positions_calculated_total,
            cache_operations_total,
            errors_total,
            worker_tasks_total,
            kernel_verifications_total,
            http_request_duration_seconds,
            positions_duration_seconds,
            worker_pool_size,
            worker_pool_queue_size,
            cache_size_entries,
            cache_hit_rate,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_http_request(&self, method: &str, endpoint: &str, status: u16, duration_seconds: f64) {
        self.http_requests_total
            .with_label_values(&[method, endpoint, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[endpoint])
            .observe(duration_seconds);
    }

    pub fn record_positions_calculated(&self, system: &str, bundle_tag: &str, cache: &str, duration_seconds: f64) {
        self.positions_calculated_total
            .with_label_values(&[system, bundle_tag, cache])
            .inc();
        self.positions_duration_seconds.with_label_values(&[system]).observe(duration_seconds);
    }

    pub fn record_cache_op(&self, op: &str) {
        self.cache_operations_total.with_label_values(&[op]).inc();
    }

    pub fn record_error(&self, code: &str, category: &str) {
        self.errors_total.with_label_values(&[code, category]).inc();
    }

    pub fn record_worker_task(&self, status: &str) {
        self.worker_tasks_total.with_label_values(&[status]).inc();
    }

    pub fn record_kernel_verification(&self, valid: bool) {
        self.kernel_verifications_total
            .with_label_values(&[if valid { "true" } else { "false" }])
            .inc();
    }

    pub fn set_worker_pool_size(&self, pool: &str, size: f64) {
        self.worker_pool_size.with_label_values(&[pool]).set(size);
    }

    pub fn set_worker_pool_queue_size(&self, pool: &str, depth: f64) {
        self.worker_pool_queue_size.with_label_values(&[pool]).set(depth);
    }

    pub fn set_cache_size_entries(&self, tier: &str, count: f64) {
        self.cache_size_entries.with_label_values(&[tier]).set(count);
    }

    pub fn set_cache_hit_rate(&self, tier: &str, rate: f64) {
        self.cache_hit_rate.with_label_values(&[tier]).set(rate);
    }

    /// Render the current state as Prometheus text exposition.
    pub fn encode_text(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buf = Vec::new();
        encoder.encode(&metric_families, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_text_includes_registered_series() {
        let metrics = Metrics::new();
        metrics.record_http_request("POST", "/v1/positions", 200, 0.01);
        metrics.record_cache_op("hit");
        metrics.set_cache_hit_rate("l1", 0.75);

        let text = metrics.encode_text();
        assert!(text.contains("http_requests_total"));
        assert!(text.contains("involution_cache_operations_total"));
        assert!(text.contains("involution_cache_hit_rate"));
    }

    #[test]
    fn error_counter_distinguishes_codes() {
        let metrics = Metrics::new();
        metrics.record_error("VALIDATION.BAD_INPUT", "client");
        metrics.record_error("CACHE.L2_UNAVAILABLE", "infrastructure");
        let text = metrics.encode_text();
        assert!(text.contains("VALIDATION.BAD_INPUT"));
        assert!(text.contains("CACHE.L2_UNAVAILABLE"));
    }
}
