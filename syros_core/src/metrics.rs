//! Process-wide, lock-free request counters and latency histograms
//! (§4.2/§4.4/§5), exposed on the `/metrics` route of §6's process
//! surface via the Prometheus text exposition format.

use prometheus::{CounterVec, HistogramVec, Opts, Registry, TextEncoder};

use crate::Result;

/// `requests_total{source,endpoint,status}` / `requests_latency{...}`,
/// plus `skipped_overlap_total` (Design Notes §9: a job whose previous
/// tick is still in flight is skipped, not queued).
pub struct Metrics {
    registry: Registry,
    requests_total: CounterVec,
    requests_latency: HistogramVec,
    skipped_overlap_total: CounterVec,
}

impl Metrics {
    /// `namespace` is the teacher-style Prometheus namespace, e.g.
    /// `syros_agent` or `syros_indexer`.
    pub fn new(namespace: &str) -> Metrics {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("requests_total", "total collector/handler invocations").namespace(namespace.to_string()),
            &["source", "endpoint", "status"],
        )
        .expect("requests_total metric is well-formed");

        let requests_latency = HistogramVec::new(
            prometheus::HistogramOpts::new("requests_latency", "collector/handler duration in seconds")
                .namespace(namespace.to_string()),
            &["source", "endpoint", "status"],
        )
        .expect("requests_latency metric is well-formed");

        let skipped_overlap_total = CounterVec::new(
            Opts::new("skipped_overlap_total", "ticks skipped because the previous run was still in flight")
                .namespace(namespace.to_string()),
            &["source"],
        )
        .expect("skipped_overlap_total metric is well-formed");

        registry
            .register(Box::new(requests_total.clone()))
            .expect("requests_total registers once");
        registry
            .register(Box::new(requests_latency.clone()))
            .expect("requests_latency registers once");
        registry
            .register(Box::new(skipped_overlap_total.clone()))
            .expect("skipped_overlap_total registers once");

        Metrics { registry, requests_total, requests_latency, skipped_overlap_total }
    }

    pub fn observe(&self, source: &str, endpoint: &str, status: &str, seconds: f64) {
        self.requests_total.with_label_values(&[source, endpoint, status]).inc();
        self.requests_latency.with_label_values(&[source, endpoint, status]).observe(seconds);
    }

    pub fn skipped_overlap(&self, source: &str) {
        self.skipped_overlap_total.with_label_values(&[source]).inc();
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let families = self.registry.gather();
        let mut buf = String::new();
        TextEncoder::new()
            .encode_utf8(&families, &mut buf)
            .map_err(|e| format_err!("metrics encode failed: {}", e))?;
        Ok(buf)
    }
}
