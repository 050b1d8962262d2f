use prometheus::{
    Registry, CounterVec, HistogramVec, HistogramOpts, Opts,
    Encoder, TextEncoder,
};
use std::sync::Arc;

/// Metrics registry for transaction preparation
pub struct MetricsRegistry {
    registry: Registry,

    // Preparation Metrics
    pub prepare_results_total: CounterVec,
    pub prepare_duration_seconds: HistogramVec,

    // Gas Estimation Metrics
    pub fee_currency_unviable_total: CounterVec,
    pub fee_currency_skipped_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let prepare_results_total = CounterVec::new(
            Opts::new("prepare_results_total", "Transaction preparation results by type")
                .namespace("wallet"),
            &["network", "result"],
        )?;
        registry.register(Box::new(prepare_results_total.clone()))?;

        let prepare_duration_seconds = HistogramVec::new(
            HistogramOpts::new("prepare_duration_seconds", "Transaction preparation duration")
                .namespace("wallet")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["network"],
        )?;
        registry.register(Box::new(prepare_duration_seconds.clone()))?;

        let fee_currency_unviable_total = CounterVec::new(
            Opts::new("fee_currency_unviable_total", "Gas estimations that failed for lack of funds")
                .namespace("wallet"),
            &["network", "fee_currency"],
        )?;
        registry.register(Box::new(fee_currency_unviable_total.clone()))?;

        let fee_currency_skipped_total = CounterVec::new(
            Opts::new("fee_currency_skipped_total", "Fee currencies skipped for an empty balance")
                .namespace("wallet"),
            &["network", "fee_currency"],
        )?;
        registry.register(Box::new(fee_currency_skipped_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            prepare_results_total,
            prepare_duration_seconds,
            fee_currency_unviable_total,
            fee_currency_skipped_total,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
