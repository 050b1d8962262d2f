use std::sync::Arc;
use std::time::Duration;

use super::MetricsRegistry;
use crate::services::token::NetworkId;

/// Collector for transaction preparation metrics
#[derive(Clone)]
pub struct PrepareMetricsCollector {
    metrics: Arc<MetricsRegistry>,
}

impl PrepareMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    pub fn record_result(&self, network: NetworkId, result: &str, elapsed: Duration) {
        self.metrics
            .prepare_results_total
            .with_label_values(&[network.as_str(), result])
            .inc();

        self.metrics
            .prepare_duration_seconds
            .with_label_values(&[network.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_unviable_fee_currency(&self, network: NetworkId, fee_currency: &str) {
        self.metrics
            .fee_currency_unviable_total
            .with_label_values(&[network.as_str(), fee_currency])
            .inc();
    }

    pub fn record_skipped_fee_currency(&self, network: NetworkId, fee_currency: &str) {
        self.metrics
            .fee_currency_skipped_total
            .with_label_values(&[network.as_str(), fee_currency])
            .inc();
    }
}
