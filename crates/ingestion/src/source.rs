//! AudioSource trait - audio frame source abstraction
//!
//! Unified interface over the real microphone capture and test sources, so
//! the pipeline is identical in both cases.

use std::sync::Arc;

use contracts::ContractError;

/// Frame callback type
///
/// Invoked from the source's capture thread with one analysis frame of mono
/// float samples. Implementations of the callback must return quickly and
/// must never panic into the capture thread.
pub type AudioFrameCallback = Arc<dyn Fn(&[f32]) + Send + Sync>;

/// Audio frame source trait
///
/// Single-consumer: `listen` registers the one callback. Repeated calls
/// while already listening are idempotent no-ops.
pub trait AudioSource: Send + Sync {
    /// Source name (used for logging)
    fn name(&self) -> &str;

    /// Sample rate of the delivered frames in Hz
    fn sample_rate(&self) -> u32;

    /// Start capture and deliver frames to `callback`
    ///
    /// # Errors
    /// Returns an error when the underlying capture cannot be started
    /// (e.g. no input device); never after frames have begun flowing.
    fn listen(&self, callback: AudioFrameCallback) -> Result<(), ContractError>;

    /// Stop capture; idempotent
    fn stop(&self);

    /// Whether frames are currently being delivered
    fn is_listening(&self) -> bool;
}
