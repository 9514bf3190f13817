use std::time::Duration;

use once_cell::sync::Lazy;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

// Prometheus metrics (default registry, exported by common::admin_http)
pub static RPC_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "products_rpc_requests_total",
        "Total RPC requests handled, by pattern and outcome",
        &["pattern", "outcome"]
    )
    .expect("register rpc_requests_total")
});

pub static RPC_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "products_rpc_duration_seconds",
        "RPC handling duration in seconds",
        &["pattern"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register rpc_duration")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    ClientError,
    ServerError,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ok => "ok",
            Outcome::ClientError => "client_error",
            Outcome::ServerError => "server_error",
        }
    }
}

pub fn record(pattern: &str, outcome: Outcome, elapsed: Duration) {
    RPC_REQUESTS_TOTAL.with_label_values(&[pattern, outcome.as_str()]).inc();
    RPC_DURATION.with_label_values(&[pattern]).observe(elapsed.as_secs_f64());
}
