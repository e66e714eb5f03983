//! Audio pipeline: source frames -> detection -> bounded beat channel.
//!
//! The frame callback is the real-time path. It runs detection, applies the
//! silence gate, and `try_send`s qualifying events; it never blocks on the
//! channel or on I/O. Saturation drops the event and counts it.

use std::sync::Arc;
use std::time::Instant;

use async_channel::{bounded, Receiver, Sender, TrySendError};
use contracts::{BeatDetector, BeatEvent, ContractError, SettingsHandle};
use metrics::counter;
use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

use crate::config::IngestionMetrics;
use crate::source::{AudioFrameCallback, AudioSource};

/// Wires an audio source and a detector to the beat-event channel
pub struct AudioPipeline {
    source: Arc<dyn AudioSource>,
    detector: Arc<Mutex<Box<dyn BeatDetector>>>,
    settings: Arc<SettingsHandle>,
    metrics: Arc<IngestionMetrics>,
    tx: Sender<BeatEvent>,
    rx: Option<Receiver<BeatEvent>>,
}

impl AudioPipeline {
    /// Create a pipeline with a bounded event channel
    pub fn new(
        source: Arc<dyn AudioSource>,
        detector: Box<dyn BeatDetector>,
        settings: Arc<SettingsHandle>,
        channel_capacity: usize,
    ) -> Self {
        let (tx, rx) = bounded(channel_capacity);
        Self {
            source,
            detector: Arc::new(Mutex::new(detector)),
            settings,
            metrics: Arc::new(IngestionMetrics::new()),
            tx,
            rx: Some(rx),
        }
    }

    /// Get the beat-event receiver
    ///
    /// Note: can only be called once, subsequent calls return None
    pub fn take_receiver(&mut self) -> Option<Receiver<BeatEvent>> {
        self.rx.take()
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Start capture
    pub fn start(&self) -> Result<(), ContractError> {
        let detector = Arc::clone(&self.detector);
        let settings = Arc::clone(&self.settings);
        let metrics = Arc::clone(&self.metrics);
        let tx = self.tx.clone();
        let sample_rate = self.source.sample_rate();

        let callback: AudioFrameCallback = Arc::new(move |samples| {
            let detection = detector.lock().process(samples, sample_rate);
            metrics.record_frame();

            // Silence gate: the whole frame is discarded, beat or not.
            if detection.volume < settings.load().min_volume {
                metrics.record_silent();
                return;
            }

            if !(detection.is_beat && detection.pitch_hz > 0.0) {
                return;
            }

            let event = BeatEvent {
                at: Instant::now(),
                frequency_hz: detection.pitch_hz,
                volume: detection.volume,
            };

            match tx.try_send(event) {
                Ok(()) => {
                    metrics.record_beat();
                    counter!("beatglow_beats_detected_total").increment(1);
                    trace!(
                        freq = event.frequency_hz,
                        volume = event.volume,
                        "beat event emitted"
                    );
                }
                Err(TrySendError::Full(_)) => {
                    metrics.record_dropped();
                    counter!("beatglow_beat_events_dropped_total").increment(1);
                    warn!("beat channel full, event dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    error!("beat channel closed, engine gone");
                }
            }
        });

        debug!(source = self.source.name(), "starting audio pipeline");
        self.source.listen(callback)
    }

    /// Stop capture; in-flight channel events remain consumable
    pub fn stop(&self) {
        self.source.stop();
    }

    /// Whether the source is delivering frames
    pub fn is_running(&self) -> bool {
        self.source.is_listening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockAudioSource;
    use contracts::{Detection, EngineSettings};
    use std::time::Duration;

    /// Detector stub with a fixed verdict per frame index
    struct ScriptedDetector {
        verdicts: Vec<Detection>,
        cursor: usize,
    }

    impl BeatDetector for ScriptedDetector {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn process(&mut self, _samples: &[f32], _rate: u32) -> Detection {
            let d = self.verdicts[self.cursor.min(self.verdicts.len() - 1)];
            self.cursor += 1;
            d
        }
    }

    fn settings_with_min_volume(min_volume: f32) -> Arc<SettingsHandle> {
        Arc::new(SettingsHandle::new(EngineSettings {
            min_volume,
            ..Default::default()
        }))
    }

    fn drain_source(pipeline: &AudioPipeline) {
        for _ in 0..200 {
            if !pipeline.is_running() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("mock source never finished");
    }

    #[test]
    fn test_qualifying_beat_reaches_channel() {
        let source = Arc::new(MockAudioSource::new(
            44_100,
            Duration::ZERO,
            vec![vec![0.5; 16]],
        ));
        let detector = Box::new(ScriptedDetector {
            verdicts: vec![Detection {
                is_beat: true,
                pitch_hz: 120.0,
                volume: 0.25,
            }],
            cursor: 0,
        });
        let mut pipeline =
            AudioPipeline::new(source, detector, settings_with_min_volume(0.005), 8);
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain_source(&pipeline);

        let event = rx.try_recv().unwrap();
        assert_eq!(event.frequency_hz, 120.0);
        assert_eq!(pipeline.metrics().snapshot().beats_emitted, 1);
    }

    #[test]
    fn test_silence_gate_discards_beat_frames() {
        let source = Arc::new(MockAudioSource::new(
            44_100,
            Duration::ZERO,
            vec![vec![0.0; 16]],
        ));
        // A beat verdict, but below the volume floor - must be discarded.
        let detector = Box::new(ScriptedDetector {
            verdicts: vec![Detection {
                is_beat: true,
                pitch_hz: 120.0,
                volume: 0.001,
            }],
            cursor: 0,
        });
        let mut pipeline =
            AudioPipeline::new(source, detector, settings_with_min_volume(0.005), 8);
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain_source(&pipeline);

        assert!(rx.try_recv().is_err());
        let snapshot = pipeline.metrics().snapshot();
        assert_eq!(snapshot.silent_frames, 1);
        assert_eq!(snapshot.beats_emitted, 0);
    }

    #[test]
    fn test_zero_pitch_suppresses_dispatch() {
        let source = Arc::new(MockAudioSource::new(
            44_100,
            Duration::ZERO,
            vec![vec![0.5; 16]],
        ));
        let detector = Box::new(ScriptedDetector {
            verdicts: vec![Detection {
                is_beat: true,
                pitch_hz: 0.0,
                volume: 0.25,
            }],
            cursor: 0,
        });
        let mut pipeline =
            AudioPipeline::new(source, detector, settings_with_min_volume(0.005), 8);
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain_source(&pipeline);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_saturated_channel_drops_not_blocks() {
        let frames: Vec<Vec<f32>> = (0..4).map(|_| vec![0.5; 16]).collect();
        let source = Arc::new(MockAudioSource::new(44_100, Duration::ZERO, frames));
        let beat = Detection {
            is_beat: true,
            pitch_hz: 120.0,
            volume: 0.25,
        };
        let detector = Box::new(ScriptedDetector {
            verdicts: vec![beat; 4],
            cursor: 0,
        });
        // Capacity one and no consumer: three of four events must drop.
        let mut pipeline =
            AudioPipeline::new(source, detector, settings_with_min_volume(0.005), 1);
        let _rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain_source(&pipeline);

        let snapshot = pipeline.metrics().snapshot();
        assert_eq!(snapshot.beats_emitted, 1);
        assert_eq!(snapshot.events_dropped, 3);
    }
}
