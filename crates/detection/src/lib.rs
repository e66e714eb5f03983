//! # Detection
//!
//! Beat/pitch detector implementations behind the `contracts::BeatDetector`
//! trait.
//!
//! Two variants, selected once at startup:
//! - [`FallbackDetector`] - energy threshold + FFT magnitude peak, always
//!   available
//! - `AubioDetector` - delegation to the aubio tempo/pitch estimators,
//!   behind the `aubio-dsp` cargo feature

mod fallback;

#[cfg(feature = "aubio-dsp")]
mod aubio_detector;

pub use fallback::FallbackDetector;

#[cfg(feature = "aubio-dsp")]
pub use aubio_detector::AubioDetector;

use std::sync::Arc;

use contracts::{AudioConfig, BeatDetector, SettingsHandle};
use tracing::info;

/// Build the best available detector for this build
///
/// Prefers the aubio estimators when compiled in and constructible; falls
/// back to the built-in energy/FFT detector otherwise. Selection happens
/// here, never via runtime type inspection downstream.
pub fn create_detector(
    audio: &AudioConfig,
    settings: Arc<SettingsHandle>,
) -> Box<dyn BeatDetector> {
    #[cfg(feature = "aubio-dsp")]
    {
        match AubioDetector::new(audio) {
            Ok(detector) => {
                info!(detector = detector.name(), "aubio beat detection enabled");
                return Box::new(detector);
            }
            Err(e) => {
                tracing::warn!(error = %e, "aubio unavailable, using fallback detection");
            }
        }
    }

    let _ = audio;
    let detector = FallbackDetector::new(settings);
    info!(detector = detector.name(), "fallback beat detection enabled");
    Box::new(detector)
}
