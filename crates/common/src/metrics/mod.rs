//! Metrics and observability utilities
//!
//! Metric names share the `unipath` prefix. Recording is a no-op until a
//! recorder (the gateway's Prometheus exporter) is installed.

use metrics::{counter, describe_counter, describe_histogram, gauge, describe_gauge, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all UniPath metrics
pub const METRICS_PREFIX: &str = "unipath";

/// Histogram buckets for request latency (in seconds)
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000,
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_directory_queries_total", METRICS_PREFIX),
        Unit::Count,
        "Directory listing queries"
    );

    describe_histogram!(
        format!("{}_directory_filter_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Time spent filtering the record set"
    );

    describe_gauge!(
        format!("{}_directory_results_count", METRICS_PREFIX),
        Unit::Count,
        "Records returned by the last directory query"
    );

    describe_counter!(
        format!("{}_university_writes_total", METRICS_PREFIX),
        Unit::Count,
        "University create/replace/upsert/toggle operations"
    );

    describe_counter!(
        format!("{}_leads_total", METRICS_PREFIX),
        Unit::Count,
        "Leads captured"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record one directory query; `active_facets` is the number of non-empty criteria
pub fn record_directory_query(duration_secs: f64, active_facets: usize, result_count: usize) {
    counter!(
        format!("{}_directory_queries_total", METRICS_PREFIX),
        "facets" => active_facets.to_string()
    )
    .increment(1);

    histogram!(format!("{}_directory_filter_duration_seconds", METRICS_PREFIX)).record(duration_secs);

    gauge!(format!("{}_directory_results_count", METRICS_PREFIX)).set(result_count as f64);
}

pub fn record_university_write(operation: &str) {
    counter!(
        format!("{}_university_writes_total", METRICS_PREFIX),
        "operation" => operation.to_string()
    )
    .increment(1);
}

pub fn record_lead(kind: &str) {
    counter!(
        format!("{}_leads_total", METRICS_PREFIX),
        "kind" => kind.to_string()
    )
    .increment(1);
}
