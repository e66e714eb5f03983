//! Mock audio source
//!
//! Plays a fixed list of frames from a background thread, for tests and
//! for running the pipeline without a microphone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use contracts::ContractError;
use parking_lot::Mutex;
use tracing::debug;

use crate::source::{AudioFrameCallback, AudioSource};

/// Test source delivering pre-baked frames
pub struct MockAudioSource {
    sample_rate: u32,
    interval: Duration,
    frames: Mutex<Vec<Vec<f32>>>,
    running: Arc<AtomicBool>,
}

impl MockAudioSource {
    /// Create a source that plays `frames` once, `interval` apart
    pub fn new(sample_rate: u32, interval: Duration, frames: Vec<Vec<f32>>) -> Self {
        Self {
            sample_rate,
            interval,
            frames: Mutex::new(frames),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A frame of silence
    pub fn silent_frame(len: usize) -> Vec<f32> {
        vec![0.0; len]
    }

    /// A sine frame at the given frequency and amplitude
    pub fn sine_frame(len: usize, sample_rate: u32, freq_hz: f32, amplitude: f32) -> Vec<f32> {
        (0..len)
            .map(|i| {
                amplitude
                    * (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }
}

impl AudioSource for MockAudioSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn listen(&self, callback: AudioFrameCallback) -> Result<(), ContractError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let frames: Vec<Vec<f32>> = std::mem::take(&mut *self.frames.lock());
        let interval = self.interval;
        let running = Arc::clone(&self.running);

        thread::spawn(move || {
            debug!(frames = frames.len(), "mock audio source started");
            for frame in frames {
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                callback(&frame);
                if !interval.is_zero() {
                    thread::sleep(interval);
                }
            }
            running.store(false, Ordering::SeqCst);
            debug!("mock audio source finished");
        });

        Ok(())
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    fn is_listening(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_plays_all_frames_then_stops() {
        let source = MockAudioSource::new(
            44_100,
            Duration::ZERO,
            vec![vec![0.0; 8], vec![0.1; 8], vec![0.2; 8]],
        );
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_cb = Arc::clone(&seen);

        source
            .listen(Arc::new(move |frame| {
                assert_eq!(frame.len(), 8);
                seen_cb.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        // Playback runs on a background thread
        for _ in 0..100 {
            if !source.is_listening() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert!(!source.is_listening());
    }
}
