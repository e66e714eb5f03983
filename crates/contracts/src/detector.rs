//! BeatDetector trait - pluggable beat/pitch analysis
//!
//! Two implementations exist: the always-available energy/FFT fallback and
//! an optional delegation to an external DSP library. The pipeline is
//! agnostic to which one is active.

use crate::Detection;

/// Beat and pitch detector over fixed-size sample frames
///
/// # Failure semantics
///
/// `process` must never propagate an error: any internal failure is caught,
/// logged by the implementation, and reported as [`Detection::silent`] so
/// that audio ingestion keeps running.
pub trait BeatDetector: Send {
    /// Implementation name (used for logging)
    fn name(&self) -> &'static str;

    /// Analyse one frame of mono float samples
    fn process(&mut self, samples: &[f32], sample_rate_hz: u32) -> Detection;
}
