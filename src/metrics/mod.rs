//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, Counter, CounterVec, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Content lookups
    pub week_lookup_requests: CounterVec,
    pub search_requests: CounterVec,

    // Personalization pipeline
    pub personalization_requests: CounterVec,
    pub generation_fallbacks: Counter,

    // Request timing
    pub request_duration: HistogramVec,
}

impl Metrics {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let week_lookup_requests = register_counter_vec_with_registry!(
            Opts::new("week_lookup_requests_total", "Total week lookup requests"),
            &["status"],
            registry
        )?;

        let search_requests = register_counter_vec_with_registry!(
            Opts::new("search_requests_total", "Total semantic search requests"),
            &["status"],
            registry
        )?;

        let personalization_requests = register_counter_vec_with_registry!(
            Opts::new(
                "personalization_requests_total",
                "Total personalization requests by outcome"
            ),
            &["status"],
            registry
        )?;

        let generation_fallbacks = register_counter_with_registry!(
            Opts::new(
                "generation_fallbacks_total",
                "Developments that fell back to rule templates"
            ),
            registry
        )?;

        let request_duration = register_histogram_vec_with_registry!(
            "request_duration_seconds",
            "Request duration in seconds",
            &["endpoint"],
            registry
        )?;

        Ok(Self {
            registry,
            week_lookup_requests,
            search_requests,
            personalization_requests,
            generation_fallbacks,
            request_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_week_lookup(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.week_lookup_requests.with_label_values(&[status]).inc();
    }

    pub fn record_search(&self, success: bool) {
        let status = if success { "success" } else { "degraded" };
        self.search_requests.with_label_values(&[status]).inc();
    }

    /// Outcome label is the personalization status ("ai", "rule_based",
    /// "degraded") or "error" for rejected requests.
    pub fn record_personalization(&self, outcome: &str) {
        self.personalization_requests
            .with_label_values(&[outcome])
            .inc();
    }

    pub fn record_generation_fallback(&self) {
        self.generation_fallbacks.inc();
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
