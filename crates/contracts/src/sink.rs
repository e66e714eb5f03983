//! PublishSink trait - outbound command interface
//!
//! Defines the abstract interface the engine publishes device commands
//! through. Connection lifecycle (connect/reconnect/backoff) is entirely the
//! implementation's concern; the engine only sees per-call success/failure.

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// MQTT-style delivery class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosClass {
    /// Fire and forget (0) - used for on/colour changes, a miss is cosmetic
    AtMostOnce,
    /// At least once (1)
    AtLeastOnce,
    /// Exactly once (2) - used for off commands, a miss leaves lights stuck on
    ExactlyOnce,
}

/// Command publish trait
///
/// A failed publish is never retried inline by callers; the next qualifying
/// beat or flash sweep is the retry mechanism by construction.
#[trait_variant::make(PublishSink: Send)]
pub trait LocalPublishSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Publish one command payload to a device topic
    ///
    /// # Errors
    /// Returns a publish error (should include the topic)
    async fn publish(&self, topic: &str, payload: &str, qos: QosClass)
        -> Result<(), ContractError>;
}
