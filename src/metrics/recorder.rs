//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry, Encoder,
    HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use tracing::error;

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records one identity resolution. `mode` is `required` or `optional`;
    /// `result` is `success`, `missing`, or a rejection kind.
    fn record_auth_attempt(&self, mode: &str, result: &str);

    /// Records how long an identity resolution took.
    fn record_auth_duration(&self, mode: &str, duration_secs: f64);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    auth_requests_total: IntCounterVec,
    auth_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Creates a new metrics instance with its own Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let auth_requests_total = register_int_counter_vec_with_registry!(
            Opts::new(
                "auth_requests_total",
                "Total number of identity resolutions by mode and outcome"
            ),
            &["mode", "result"],
            registry.clone()
        )
        .expect("Failed to register auth_requests_total");

        let auth_duration_seconds = register_histogram_vec_with_registry!(
            "auth_duration_seconds",
            "Identity resolution duration in seconds",
            &["mode"],
            vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0],
            registry.clone()
        )
        .expect("Failed to register auth_duration_seconds");

        Metrics {
            registry,
            auth_requests_total,
            auth_duration_seconds,
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            error!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_auth_attempt(&self, mode: &str, result: &str) {
        self.auth_requests_total
            .with_label_values(&[mode, result])
            .inc();
    }

    fn record_auth_duration(&self, mode: &str, duration_secs: f64) {
        self.auth_duration_seconds
            .with_label_values(&[mode])
            .observe(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_attempts_are_rendered() {
        let metrics = Metrics::new();
        metrics.record_auth_attempt("required", "expired");
        metrics.record_auth_attempt("required", "expired");
        metrics.record_auth_duration("required", 0.002);

        let text = metrics.render();
        assert!(text.contains(r#"auth_requests_total{mode="required",result="expired"} 2"#));
        assert!(text.contains("auth_duration_seconds_bucket"));
    }
}
