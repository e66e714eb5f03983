//! # Ingestion
//!
//! Audio capture and beat-event production.
//!
//! An [`AudioSource`] delivers mono sample frames through a registered
//! callback from its capture thread. The [`AudioPipeline`] runs detection
//! inside that callback, applies the silence gate, and hands qualifying
//! [`contracts::BeatEvent`]s to a bounded channel without ever blocking:
//! when the channel is saturated the event is dropped and counted.

mod config;
mod cpal_source;
mod mock;
mod pipeline;
mod source;

pub use config::{IngestionMetrics, MetricsSnapshot};
pub use cpal_source::CpalSource;
pub use mock::MockAudioSource;
pub use pipeline::AudioPipeline;
pub use source::{AudioFrameCallback, AudioSource};
