//! Built-in energy/FFT detector.
//!
//! Beat: frame energy above the configured threshold. Pitch: index of the
//! largest magnitude in the FFT spectrum (DC excluded), mapped to Hz via
//! `index * sample_rate / frame_len`. No windowing; frames are analysed as
//! captured.

use std::sync::Arc;

use contracts::{BeatDetector, Detection, SettingsHandle};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use tracing::warn;

/// Energy-threshold beat detection with FFT peak pitch estimation
pub struct FallbackDetector {
    settings: Arc<SettingsHandle>,
    planner: FftPlanner<f32>,
    buffer: Vec<Complex<f32>>,
}

impl FallbackDetector {
    /// Create a detector reading its beat threshold through `settings`,
    /// so runtime threshold updates apply on the next frame
    pub fn new(settings: Arc<SettingsHandle>) -> Self {
        Self {
            settings,
            planner: FftPlanner::new(),
            buffer: Vec::new(),
        }
    }

    /// Mean squared amplitude of the frame
    fn frame_energy(samples: &[f32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32
    }

    /// FFT magnitude peak mapped to Hz; 0.0 when no reliable pitch exists
    fn dominant_pitch(&mut self, samples: &[f32], sample_rate_hz: u32) -> f32 {
        let n = samples.len();
        if n < 2 {
            return 0.0;
        }

        let fft = self.planner.plan_fft_forward(n);
        self.buffer.clear();
        self.buffer
            .extend(samples.iter().map(|&s| Complex::new(s, 0.0)));
        fft.process(&mut self.buffer);

        // Real input: only bins up to Nyquist are meaningful.
        let half = n / 2;
        let mut spectrum_sum = self.buffer[0].norm();
        let mut peak_idx = 0usize;
        let mut peak_mag = 0.0f32;
        for (idx, bin) in self.buffer[1..=half].iter().enumerate() {
            let mag = bin.norm();
            spectrum_sum += mag;
            if mag > peak_mag {
                peak_mag = mag;
                peak_idx = idx + 1;
            }
        }

        if spectrum_sum <= 0.0 || peak_idx == 0 {
            return 0.0;
        }
        peak_idx as f32 * sample_rate_hz as f32 / n as f32
    }
}

impl BeatDetector for FallbackDetector {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn process(&mut self, samples: &[f32], sample_rate_hz: u32) -> Detection {
        let volume = Self::frame_energy(samples);
        if !volume.is_finite() {
            warn!("non-finite frame energy, treating frame as silent");
            return Detection::silent(0.0);
        }

        let is_beat = volume > self.settings.load().beat_threshold;
        let pitch_hz = self.dominant_pitch(samples, sample_rate_hz);

        Detection {
            is_beat,
            pitch_hz,
            volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::EngineSettings;

    const RATE: u32 = 44_100;
    const FRAME: usize = 2048;

    fn detector_with_threshold(beat_threshold: f32) -> FallbackDetector {
        let settings = EngineSettings {
            beat_threshold,
            ..Default::default()
        };
        FallbackDetector::new(Arc::new(SettingsHandle::new(settings)))
    }

    fn sine(freq_hz: f32, amplitude: f32) -> Vec<f32> {
        (0..FRAME)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * freq_hz * i as f32 / RATE as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_silence_is_not_a_beat() {
        let mut detector = detector_with_threshold(0.01);
        let result = detector.process(&vec![0.0; FRAME], RATE);
        assert!(!result.is_beat);
        assert_eq!(result.pitch_hz, 0.0);
        assert_eq!(result.volume, 0.0);
    }

    #[test]
    fn test_loud_sine_is_a_beat_near_its_frequency() {
        let mut detector = detector_with_threshold(0.01);
        let result = detector.process(&sine(440.0, 0.8), RATE);
        assert!(result.is_beat, "volume {} below threshold", result.volume);
        // Peak lands in the bin closest to 440 Hz; allow one bin of error
        let bin_width = RATE as f32 / FRAME as f32;
        assert!(
            (result.pitch_hz - 440.0).abs() <= bin_width,
            "pitch {} not within a bin of 440",
            result.pitch_hz
        );
    }

    #[test]
    fn test_quiet_sine_below_threshold() {
        let mut detector = detector_with_threshold(0.01);
        let result = detector.process(&sine(440.0, 0.01), RATE);
        assert!(!result.is_beat);
    }

    #[test]
    fn test_dc_only_frame_has_no_pitch() {
        let mut detector = detector_with_threshold(0.0);
        let result = detector.process(&vec![1.0; FRAME], RATE);
        assert!(result.is_beat);
        assert_eq!(result.pitch_hz, 0.0);
    }

    #[test]
    fn test_threshold_update_applies_next_frame() {
        let settings = Arc::new(SettingsHandle::default());
        let mut detector = FallbackDetector::new(Arc::clone(&settings));

        let frame = sine(440.0, 0.05);
        assert!(detector.process(&frame, RATE).is_beat);

        let mut raised = *settings.load();
        raised.beat_threshold = 10.0;
        settings.store(raised);
        assert!(!detector.process(&frame, RATE).is_beat);
    }
}
