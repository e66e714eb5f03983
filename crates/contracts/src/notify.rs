//! NotificationSink trait - fire-and-forget state-change events
//!
//! Consumed by UI/telemetry collaborators. No engine logic depends on a
//! notification being delivered; implementations must never block the caller.

use serde::Serialize;

use crate::Rgb;

/// Visible state reported in a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    On,
    Flash,
    Off,
}

/// A device state change, as observed after a dispatch or flash sweep
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStateEvent {
    pub device_id: String,
    pub device_name: String,
    pub state: DeviceState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
}

impl DeviceStateEvent {
    /// A visible "on" change with the chosen colour and the beat that drove it
    pub fn lit(
        device_id: impl Into<String>,
        device_name: impl Into<String>,
        state: DeviceState,
        colour: Rgb,
        colour_name: Option<String>,
        pitch: f32,
        volume: f32,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            state,
            hex: Some(colour.to_hex()),
            colour: Some(colour),
            colour_name,
            pitch: Some(pitch),
            volume: Some(volume),
        }
    }

    /// A flash expiry
    pub fn off(device_id: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_name: device_name.into(),
            state: DeviceState::Off,
            colour: None,
            hex: None,
            colour_name: None,
            pitch: None,
            volume: None,
        }
    }
}

/// Fire-and-forget event consumer
///
/// `emit` must return immediately; saturated implementations drop and log
/// rather than block the dispatch path.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, event: DeviceStateEvent);
}

/// Sink that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn emit(&self, _event: DeviceStateEvent) {}
}
