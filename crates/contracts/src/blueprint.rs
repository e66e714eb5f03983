//! AppBlueprint - Config Loader output
//!
//! Describes the complete application configuration: broker endpoint, audio
//! capture, engine settings, device list.

use serde::{Deserialize, Serialize};

use crate::{Device, EngineSettings};

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppBlueprint {
    /// MQTT broker endpoint
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Audio capture settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Dispatch settings
    #[serde(default)]
    pub app: AppSettings,

    /// Configured devices
    #[serde(default)]
    pub devices: Vec<Device>,
}

impl AppBlueprint {
    /// Build the runtime engine settings from the static configuration
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            debug: self.app.debug,
            min_publish_interval: self.app.min_publish_interval,
            beat_threshold: self.audio.beat_threshold,
            min_volume: self.audio.min_volume,
            flash_duration: self.app.flash_duration,
        }
    }
}

/// MQTT broker endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Broker hostname or IP
    #[serde(default = "default_broker_host")]
    pub host: String,

    /// Broker TCP port
    #[serde(default = "default_broker_port")]
    pub port: u16,

    /// Optional credentials
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,

    /// MQTT client identifier
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: default_broker_host(),
            port: default_broker_port(),
            username: None,
            password: None,
            client_id: default_client_id(),
        }
    }
}

fn default_broker_host() -> String {
    "localhost".to_string()
}

fn default_broker_port() -> u16 {
    1883
}

fn default_client_id() -> String {
    "beatglow".to_string()
}

/// Audio capture configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Analysis frame size in samples (the capture block is half of this)
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Capture sample rate in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Capture channel count; only the first channel is analysed
    #[serde(default = "default_channels")]
    pub channels: u16,

    /// Silence gate: frames below this mean squared amplitude are discarded
    #[serde(default = "default_min_volume")]
    pub min_volume: f32,

    /// Fallback detector energy threshold
    #[serde(default = "default_beat_threshold")]
    pub beat_threshold: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
            min_volume: default_min_volume(),
            beat_threshold: default_beat_threshold(),
        }
    }
}

fn default_buffer_size() -> usize {
    2048
}

fn default_sample_rate() -> u32 {
    44_100
}

fn default_channels() -> u16 {
    1
}

fn default_min_volume() -> f32 {
    0.005
}

fn default_beat_threshold() -> f32 {
    0.01
}

/// Dispatch settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AppSettings {
    /// Emit per-skip debug logging
    #[serde(default)]
    pub debug: bool,

    /// Minimum seconds between two publishes to the same device
    #[serde(default = "default_min_publish_interval")]
    pub min_publish_interval: f64,

    /// Seconds a flash-mode device stays on
    #[serde(default = "default_flash_duration")]
    pub flash_duration: f64,

    /// Concurrent per-device dispatch task bound
    #[serde(default = "default_worker_pool")]
    pub worker_pool: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            debug: false,
            min_publish_interval: default_min_publish_interval(),
            flash_duration: default_flash_duration(),
            worker_pool: default_worker_pool(),
        }
    }
}

fn default_min_publish_interval() -> f64 {
    0.1
}

fn default_flash_duration() -> f64 {
    0.3
}

fn default_worker_pool() -> usize {
    20
}
