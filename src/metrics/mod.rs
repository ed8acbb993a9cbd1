//! Metrics collection for observability

use prometheus::{
    CounterVec, Gauge, HistogramVec, Opts, Registry,
    register_counter_vec_with_registry, register_gauge_with_registry,
    register_histogram_vec_with_registry,
};
use std::sync::Arc;
use once_cell::sync::Lazy;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> = Lazy::new(|| {
    Arc::new(Metrics::new().expect("Failed to initialize metrics"))
});

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Resolution metrics
    pub resolutions: CounterVec,
    pub resolution_errors: CounterVec,
    pub cache_entries: Gauge,

    // Self-hosted server metrics
    pub requests: CounterVec,
    pub request_duration: HistogramVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let resolutions = register_counter_vec_with_registry!(
            Opts::new("context_window_resolutions_total", "Total context window resolutions"),
            &["provider", "source"],
            registry
        )?;

        let resolution_errors = register_counter_vec_with_registry!(
            Opts::new("context_window_resolution_errors_total", "Total failed resolutions"),
            &["provider", "kind"],
            registry
        )?;

        let cache_entries = register_gauge_with_registry!(
            Opts::new("context_window_cache_entries", "Entries in the resolution cache"),
            registry
        )?;

        let requests = register_counter_vec_with_registry!(
            Opts::new("self_hosted_requests_total", "Total requests to the self-hosted server"),
            &["operation", "status"],
            registry
        )?;

        let request_duration = register_histogram_vec_with_registry!(
            "self_hosted_request_duration_seconds",
            "Self-hosted server request duration in seconds",
            &["operation"],
            registry
        )?;

        Ok(Self {
            registry,
            resolutions,
            resolution_errors,
            cache_entries,
            requests,
            request_duration,
        })
    }

    /// Get the registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a successful resolution and where it came from
    pub fn record_resolution(&self, provider: &str, source: &str) {
        self.resolutions.with_label_values(&[provider, source]).inc();
    }

    pub fn record_resolution_error(&self, provider: &str, kind: &str) {
        self.resolution_errors.with_label_values(&[provider, kind]).inc();
    }

    pub fn set_cache_entries(&self, entries: usize) {
        self.cache_entries.set(entries as f64);
    }

    pub fn record_request(&self, operation: &str, status: &str) {
        self.requests.with_label_values(&[operation, status]).inc();
    }

    pub fn observe_request_duration(&self, operation: &str, seconds: f64) {
        self.request_duration
            .with_label_values(&[operation])
            .observe(seconds);
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
