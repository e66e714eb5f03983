//! Device model consumed by the dispatch engine.
//!
//! Devices are owned by the registry; the engine only ever works on cloned
//! snapshots, so everything here is plain data.

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// An inclusive frequency band in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    /// Lower bound in Hz
    pub min: f32,
    /// Upper bound in Hz
    pub max: f32,
}

impl FrequencyRange {
    /// The audible spectrum, used when a device configures no ranges
    pub const FULL_SPECTRUM: Self = Self {
        min: 20.0,
        max: 20_000.0,
    };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Inclusive membership test
    pub fn contains(&self, hz: f32) -> bool {
        self.min <= hz && hz <= self.max
    }
}

/// Named frequency band presets for device configuration
pub mod presets {
    use super::FrequencyRange;

    pub const SUB_BASS: FrequencyRange = FrequencyRange::new(20.0, 60.0);
    pub const BASS: FrequencyRange = FrequencyRange::new(60.0, 250.0);
    pub const LOW_MID: FrequencyRange = FrequencyRange::new(250.0, 500.0);
    pub const MID: FrequencyRange = FrequencyRange::new(500.0, 2000.0);
    pub const HIGH_MID: FrequencyRange = FrequencyRange::new(2000.0, 4000.0);
    pub const PRESENCE: FrequencyRange = FrequencyRange::new(4000.0, 6000.0);
    pub const BRILLIANCE: FrequencyRange = FrequencyRange::new(6000.0, 20_000.0);
    pub const FULL: FrequencyRange = FrequencyRange::FULL_SPECTRUM;
}

/// Device protocol family
///
/// Determines payload rendering. Unrecognised values deserialise to
/// `Unknown`, which only ever receives the safe off payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Zigbee,
    Tasmota,
    #[serde(other)]
    Unknown,
}

/// Per-beat behaviour of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceMode {
    /// New colour on every qualifying beat
    #[default]
    Reactive,
    /// Full on at a beat, auto-off after the flash duration
    Flash,
}

/// A controllable light
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    /// Unique identifier
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Publish sink address (MQTT topic)
    pub topic: String,

    /// Protocol family
    #[serde(rename = "type", default)]
    pub device_type: DeviceType,

    /// Disabled devices are never snapshotted by the engine
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Operating mode
    #[serde(default)]
    pub mode: DeviceMode,

    /// Colour used in flash mode when `flash_random` is off
    #[serde(default = "default_flash_colour")]
    pub flash_colour: Rgb,

    /// Pick a random colour for each flash instead of `flash_colour`
    #[serde(default)]
    pub flash_random: bool,

    /// Brightness 1..=255
    #[serde(default = "default_brightness")]
    pub brightness: u8,

    /// Bands the device reacts to; defaults to the full spectrum
    #[serde(default = "default_freq_ranges")]
    pub freq_ranges: Vec<FrequencyRange>,
}

fn default_enabled() -> bool {
    true
}

fn default_flash_colour() -> Rgb {
    Rgb::new(255, 0, 0)
}

fn default_brightness() -> u8 {
    155
}

fn default_freq_ranges() -> Vec<FrequencyRange> {
    vec![FrequencyRange::FULL_SPECTRUM]
}

impl Device {
    /// True if the frequency falls within at least one configured range
    pub fn reacts_to(&self, hz: f32) -> bool {
        self.freq_ranges.iter().any(|r| r.contains(hz))
    }
}
