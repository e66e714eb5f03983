//! # Sinks
//!
//! Outbound surfaces: the MQTT publish sink the engine sends device
//! commands through, a dry-run log sink, and notification sinks for
//! state-change events.

pub mod log;
pub mod metrics;
pub mod mqtt;
pub mod notify;

pub use contracts::{NotificationSink, PublishSink, QosClass};
pub use log::LogSink;
pub use metrics::{SinkMetrics, SinkMetricsSnapshot};
pub use mqtt::MqttSink;
pub use notify::{ChannelNotifier, LogNotifier};
