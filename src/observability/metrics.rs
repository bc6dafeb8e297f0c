use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec, TextEncoder,
};

static STORE_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "store_operations_total",
        "Total number of mock store operations",
        &["entity", "operation", "outcome"]
    )
    .unwrap()
});

// Includes the simulated delay
static STORE_OPERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "store_operation_duration_seconds",
        "Mock store operation latency in seconds",
        &["entity", "operation"],
        vec![0.001, 0.010, 0.100, 0.250, 0.500, 1.0, 2.5]
    )
    .unwrap()
});

static STORE_RECORDS: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "store_records",
        "Number of records currently held per entity",
        &["entity"]
    )
    .unwrap()
});

pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn record_store_operation(entity: &str, operation: &str, outcome: &str) {
        STORE_OPERATIONS_TOTAL
            .with_label_values(&[entity, operation, outcome])
            .inc();
    }

    pub fn record_store_latency(entity: &str, operation: &str, duration: f64) {
        STORE_OPERATION_DURATION
            .with_label_values(&[entity, operation])
            .observe(duration);
    }

    pub fn set_store_records(entity: &str, count: usize) {
        STORE_RECORDS
            .with_label_values(&[entity])
            .set(count as i64);
    }

    /// Export all metrics in Prometheus format
    pub fn export() -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        encoder.encode_to_string(&metric_families)
    }
}
