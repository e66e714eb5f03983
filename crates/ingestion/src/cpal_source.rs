//! Microphone capture via cpal.
//!
//! The cpal stream is `!Send`, so it lives on a dedicated capture thread for
//! its whole lifetime. Incoming buffers are demuxed to the first channel and
//! re-blocked into fixed analysis frames before the callback is invoked; the
//! cpal callback itself does no I/O and takes no blocking locks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use contracts::{AudioConfig, ContractError};
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::source::{AudioFrameCallback, AudioSource};

/// Capture loop poll interval while waiting for stop
const STOP_POLL: Duration = Duration::from_millis(50);

/// Default input device capture source
pub struct CpalSource {
    audio: AudioConfig,
    running: Arc<AtomicBool>,
    capture: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CpalSource {
    pub fn new(audio: AudioConfig) -> Self {
        Self {
            audio,
            running: Arc::new(AtomicBool::new(false)),
            capture: Mutex::new(None),
        }
    }

    /// Analysis frame length in samples (half the configured buffer)
    fn frame_len(&self) -> usize {
        (self.audio.buffer_size / 2).max(1)
    }
}

impl AudioSource for CpalSource {
    fn name(&self) -> &str {
        "cpal"
    }

    fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    fn listen(&self, callback: AudioFrameCallback) -> Result<(), ContractError> {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("cpal source already listening");
            return Ok(());
        }

        let audio = self.audio;
        let frame_len = self.frame_len();
        let running = Arc::clone(&self.running);
        let (startup_tx, startup_rx) = mpsc::channel::<Result<(), String>>();

        let handle = thread::Builder::new()
            .name("audio_capture".into())
            .spawn(move || {
                capture_thread(audio, frame_len, callback, running, startup_tx);
            })
            .map_err(|e| ContractError::audio_device(format!("capture thread spawn: {e}")))?;

        // Wait for the stream to come up (or fail) before reporting success.
        match startup_rx.recv() {
            Ok(Ok(())) => {
                *self.capture.lock() = Some(handle);
                Ok(())
            }
            Ok(Err(message)) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = handle.join();
                Err(ContractError::audio_stream(message))
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = handle.join();
                Err(ContractError::audio_stream("capture thread exited early"))
            }
        }
    }

    fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            // The capture thread notices the flag within one poll interval;
            // joining it guarantees the stream is torn down on return.
            if let Some(handle) = self.capture.lock().take() {
                if handle.join().is_err() {
                    error!("audio capture thread panicked");
                }
            }
            info!("audio capture stopped");
        }
    }

    fn is_listening(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Owns the cpal stream for its whole lifetime
fn capture_thread(
    audio: AudioConfig,
    frame_len: usize,
    callback: AudioFrameCallback,
    running: Arc<AtomicBool>,
    startup_tx: mpsc::Sender<Result<(), String>>,
) {
    let host = cpal::default_host();
    let device = match host.default_input_device() {
        Some(d) => d,
        None => {
            let _ = startup_tx.send(Err("no input device available".into()));
            return;
        }
    };

    let config = StreamConfig {
        channels: audio.channels,
        sample_rate: audio.sample_rate as SampleRate,
        buffer_size: cpal::BufferSize::Default,
    };

    let channels = audio.channels as usize;
    let mut pending: Vec<f32> = Vec::with_capacity(frame_len * 2);

    let data_callback = move |data: &[f32], _: &cpal::InputCallbackInfo| {
        // First channel only; re-block into fixed analysis frames.
        pending.extend(data.iter().step_by(channels));
        while pending.len() >= frame_len {
            let frame: Vec<f32> = pending.drain(..frame_len).collect();
            callback(&frame);
        }
    };

    let error_callback = |e: cpal::StreamError| {
        error!(error = %e, "audio stream error");
    };

    let stream = match device.build_input_stream(&config, data_callback, error_callback, None) {
        Ok(s) => s,
        Err(e) => {
            let _ = startup_tx.send(Err(format!("input stream build failed: {e}")));
            return;
        }
    };

    if let Err(e) = stream.play() {
        let _ = startup_tx.send(Err(format!("input stream start failed: {e}")));
        return;
    }

    info!(
        rate = audio.sample_rate,
        frame = frame_len,
        channels = audio.channels,
        "audio stream started"
    );
    let _ = startup_tx.send(Ok(()));

    while running.load(Ordering::Relaxed) {
        thread::sleep(STOP_POLL);
    }

    drop(stream);
    debug!("audio capture thread exited");
}
