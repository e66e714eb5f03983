//! Runtime-mutable engine settings.
//!
//! Every beat cycle loads a fresh snapshot through [`SettingsHandle`], so an
//! external update takes effect on the very next beat without any engine
//! restart.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// The five process-wide dispatch knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Emit per-skip debug logging
    pub debug: bool,

    /// Minimum seconds between two publishes to the same device
    pub min_publish_interval: f64,

    /// Fallback detector energy threshold for a beat
    pub beat_threshold: f32,

    /// Frames quieter than this are discarded entirely
    pub min_volume: f32,

    /// Seconds a flash-mode device stays on
    pub flash_duration: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            debug: false,
            min_publish_interval: 0.1,
            beat_threshold: 0.01,
            min_volume: 0.005,
            flash_duration: 0.3,
        }
    }
}

impl EngineSettings {
    /// Rate-limit interval as a [`Duration`]
    pub fn publish_interval(&self) -> Duration {
        Duration::from_secs_f64(self.min_publish_interval.max(0.0))
    }

    /// Flash lifetime as a [`Duration`]
    pub fn flash_lifetime(&self) -> Duration {
        Duration::from_secs_f64(self.flash_duration.max(0.0))
    }
}

/// Atomically swappable settings shared between the engine and the
/// external configuration surface
#[derive(Debug)]
pub struct SettingsHandle {
    inner: ArcSwap<EngineSettings>,
}

impl SettingsHandle {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            inner: ArcSwap::from_pointee(settings),
        }
    }

    /// Current snapshot; cheap enough to call once per beat
    pub fn load(&self) -> Arc<EngineSettings> {
        self.inner.load_full()
    }

    /// Replace the settings; visible to the next beat cycle
    pub fn store(&self, settings: EngineSettings) {
        self.inner.store(Arc::new(settings));
    }
}

impl Default for SettingsHandle {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
