//! Notification sinks for device state-change events.

use contracts::{DeviceStateEvent, NotificationSink};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Notifier that forwards events into a bounded channel
///
/// For an external consumer (UI, telemetry). `emit` never blocks; when the
/// consumer falls behind, events are dropped and counted in the log.
pub struct ChannelNotifier {
    tx: mpsc::Sender<DeviceStateEvent>,
}

impl ChannelNotifier {
    /// Create the notifier and its receiving end
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<DeviceStateEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn emit(&self, event: DeviceStateEvent) {
        if let Err(mpsc::error::TrySendError::Full(event)) = self.tx.try_send(event) {
            warn!(device = %event.device_id, "notification channel full, event dropped");
        }
    }
}

/// Notifier that logs each event as JSON
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    fn emit(&self, event: DeviceStateEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => info!(event = %json, "device state"),
            Err(error) => warn!(%error, "notification serialise failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> DeviceStateEvent {
        DeviceStateEvent::off(id, id.to_uppercase())
    }

    #[tokio::test]
    async fn test_channel_notifier_delivers() {
        let (notifier, mut rx) = ChannelNotifier::channel(4);
        notifier.emit(event("d1"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.device_id, "d1");
    }

    #[tokio::test]
    async fn test_full_channel_drops_instead_of_blocking() {
        let (notifier, mut rx) = ChannelNotifier::channel(1);
        notifier.emit(event("d1"));
        notifier.emit(event("d2"));

        assert_eq!(rx.recv().await.unwrap().device_id, "d1");
        assert!(rx.try_recv().is_err());
    }
}
