//! LogSink - logs commands via tracing instead of publishing them.
//!
//! Dry-run sink for running the pipeline without a broker.

use contracts::{ContractError, PublishSink, QosClass};
use tracing::info;

use crate::metrics::SinkMetrics;

/// Sink that logs every command it would have published
pub struct LogSink {
    name: String,
    metrics: SinkMetrics,
}

impl LogSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metrics: SinkMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }
}

impl PublishSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&self, topic: &str, payload: &str, qos: QosClass) -> Result<(), ContractError> {
        self.metrics.inc_publish_count();
        info!(sink = %self.name, topic, ?qos, payload, "dry-run publish");
        Ok(())
    }
}
