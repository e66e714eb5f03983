//! # Integration Tests
//!
//! End-to-end tests over the real pipeline components: mock audio source,
//! fallback detection, dispatch engine, recording sink. No microphone or
//! broker required.

#[cfg(test)]
mod support {
    use contracts::{ContractError, Device, DeviceMode, DeviceType, FrequencyRange, PublishSink, QosClass, Rgb};
    use parking_lot::Mutex;

    /// Publish sink that records every command
    #[derive(Default)]
    pub struct RecordingSink {
        pub published: Mutex<Vec<(String, String, QosClass)>>,
    }

    impl PublishSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn publish(
            &self,
            topic: &str,
            payload: &str,
            qos: QosClass,
        ) -> Result<(), ContractError> {
            self.published
                .lock()
                .push((topic.to_owned(), payload.to_owned(), qos));
            Ok(())
        }
    }

    pub fn device(id: &str, mode: DeviceMode, ranges: Vec<FrequencyRange>) -> Device {
        Device {
            id: id.into(),
            name: id.to_uppercase(),
            topic: format!("lights/{id}"),
            device_type: DeviceType::Zigbee,
            enabled: true,
            mode,
            flash_colour: Rgb::new(255, 0, 0),
            flash_random: false,
            brightness: 155,
            freq_ranges: ranges,
        }
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{
        AudioConfig, DeviceMode, EngineSettings, FrequencyRange, NullNotifier, QosClass,
        SettingsHandle,
    };
    use engine::{DeviceRegistry, ReactiveEngine};
    use ingestion::{AudioPipeline, AudioSource, MockAudioSource};

    use crate::support::{device, RecordingSink};

    const RATE: u32 = 44_100;
    const FRAME: usize = 1_024;

    fn settings(min_publish_interval: f64) -> Arc<SettingsHandle> {
        Arc::new(SettingsHandle::new(EngineSettings {
            min_publish_interval,
            ..Default::default()
        }))
    }

    fn pipeline_with_frames(
        frames: Vec<Vec<f32>>,
        settings: Arc<SettingsHandle>,
    ) -> AudioPipeline {
        let source = Arc::new(MockAudioSource::new(RATE, Duration::ZERO, frames));
        let audio = AudioConfig {
            sample_rate: RATE,
            ..Default::default()
        };
        let detector = detection::create_detector(&audio, Arc::clone(&settings));
        AudioPipeline::new(source, detector, settings, 16)
    }

    async fn drain(pipeline: &AudioPipeline) {
        for _ in 0..200 {
            if !pipeline.is_running() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("mock source never finished");
    }

    fn engine_for(
        devices: Vec<contracts::Device>,
        settings: Arc<SettingsHandle>,
    ) -> ReactiveEngine<RecordingSink, NullNotifier> {
        ReactiveEngine::new(
            Arc::new(DeviceRegistry::new(devices)),
            Arc::new(RecordingSink::default()),
            Arc::new(NullNotifier),
            settings,
            20,
        )
    }

    /// Consume every buffered beat event through the engine
    async fn pump(
        engine: &ReactiveEngine<RecordingSink, NullNotifier>,
        rx: &async_channel::Receiver<contracts::BeatEvent>,
    ) -> usize {
        let mut beats = 0;
        while let Ok(event) = rx.try_recv() {
            beats += 1;
            for handle in engine.handle_beat(event).await {
                handle.await.unwrap();
            }
        }
        beats
    }

    #[tokio::test]
    async fn test_loud_sine_drives_device_end_to_end() {
        let settings = settings(0.0);
        let frames: Vec<Vec<f32>> = (0..4)
            .map(|_| MockAudioSource::sine_frame(FRAME, RATE, 440.0, 0.5))
            .collect();
        let mut pipeline = pipeline_with_frames(frames, Arc::clone(&settings));
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain(&pipeline).await;

        let engine = engine_for(
            vec![device(
                "full",
                DeviceMode::Reactive,
                vec![FrequencyRange::FULL_SPECTRUM],
            )],
            settings,
        );
        let beats = pump(&engine, &rx).await;

        assert_eq!(beats, 4);
        let published = engine_publishes(&engine);
        assert_eq!(published.len(), 4);
        assert!(published.iter().all(|(topic, _, qos)| {
            topic == "lights/full" && *qos == QosClass::AtMostOnce
        }));
    }

    #[tokio::test]
    async fn test_silence_produces_no_commands() {
        let settings = settings(0.0);
        let frames = vec![MockAudioSource::silent_frame(FRAME); 4];
        let mut pipeline = pipeline_with_frames(frames, Arc::clone(&settings));
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain(&pipeline).await;

        let engine = engine_for(
            vec![device(
                "full",
                DeviceMode::Reactive,
                vec![FrequencyRange::FULL_SPECTRUM],
            )],
            settings,
        );
        let beats = pump(&engine, &rx).await;

        assert_eq!(beats, 0);
        assert!(engine_publishes(&engine).is_empty());
        assert_eq!(pipeline.metrics().snapshot().silent_frames, 4);
    }

    #[tokio::test]
    async fn test_frequency_ranges_route_between_devices() {
        let settings = settings(0.0);
        // One 440 Hz frame: within the mid band, far from the treble band.
        let frames = vec![MockAudioSource::sine_frame(FRAME, RATE, 440.0, 0.5)];
        let mut pipeline = pipeline_with_frames(frames, Arc::clone(&settings));
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain(&pipeline).await;

        let engine = engine_for(
            vec![
                device(
                    "mid",
                    DeviceMode::Reactive,
                    vec![FrequencyRange::new(250.0, 500.0)],
                ),
                device(
                    "treble",
                    DeviceMode::Reactive,
                    vec![FrequencyRange::new(5_000.0, 20_000.0)],
                ),
            ],
            settings,
        );
        pump(&engine, &rx).await;

        let published = engine_publishes(&engine);
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "lights/mid");
    }

    #[tokio::test]
    async fn test_rate_limit_holds_across_burst() {
        // Default 0.1s interval; a burst of near-simultaneous beats must
        // produce exactly one publish.
        let settings = settings(0.1);
        let frames: Vec<Vec<f32>> = (0..4)
            .map(|_| MockAudioSource::sine_frame(FRAME, RATE, 440.0, 0.5))
            .collect();
        let mut pipeline = pipeline_with_frames(frames, Arc::clone(&settings));
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain(&pipeline).await;

        let engine = engine_for(
            vec![device(
                "full",
                DeviceMode::Reactive,
                vec![FrequencyRange::FULL_SPECTRUM],
            )],
            settings,
        );
        let beats = pump(&engine, &rx).await;

        assert_eq!(beats, 4);
        assert_eq!(engine_publishes(&engine).len(), 1);
    }

    #[tokio::test]
    async fn test_flash_device_turns_off_after_lifetime() {
        let settings = settings(0.0);
        let frames = vec![MockAudioSource::sine_frame(FRAME, RATE, 440.0, 0.5)];
        let mut pipeline = pipeline_with_frames(frames, Arc::clone(&settings));
        let rx = pipeline.take_receiver().unwrap();

        pipeline.start().unwrap();
        drain(&pipeline).await;

        let engine = engine_for(
            vec![device(
                "flash",
                DeviceMode::Flash,
                vec![FrequencyRange::FULL_SPECTRUM],
            )],
            settings,
        );

        let event = rx.try_recv().unwrap();
        for handle in engine.handle_beat(event).await {
            handle.await.unwrap();
        }
        engine
            .sweep_flashes(event.at + Duration::from_millis(310))
            .await;

        let published = engine_publishes(&engine);
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].2, QosClass::ExactlyOnce);
        assert!(published[1].1.contains("OFF"));
    }

    fn engine_publishes(
        engine: &ReactiveEngine<RecordingSink, NullNotifier>,
    ) -> Vec<(String, String, QosClass)> {
        engine.publisher().published.lock().clone()
    }
}

#[cfg(test)]
mod config_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::DeviceMode;

    #[test]
    fn test_full_config_round_trip() {
        let toml = r#"
[broker]
host = "broker.local"
port = 1884
username = "viz"
password = "secret"

[audio]
sample_rate = 48000
buffer_size = 1024

[app]
min_publish_interval = 0.05
flash_duration = 0.5

[[devices]]
id = "strip"
name = "LED Strip"
topic = "zigbee2mqtt/strip/set"
mode = "flash"
flash_random = true
freq_ranges = [{ min = 60.0, max = 250.0 }]

[[devices]]
id = "bulb"
name = "Bulb"
topic = "cmnd/bulb/Backlog"
type = "tasmota"
brightness = 200
"#;

        let blueprint = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(blueprint.broker.port, 1884);
        assert_eq!(blueprint.devices.len(), 2);
        assert_eq!(blueprint.devices[0].mode, DeviceMode::Flash);
        assert!(blueprint.devices[0].flash_random);
        assert_eq!(blueprint.devices[1].brightness, 200);

        let settings = blueprint.engine_settings();
        assert_eq!(settings.min_publish_interval, 0.05);
        assert_eq!(settings.flash_duration, 0.5);
    }

    #[test]
    fn test_duplicate_device_ids_rejected() {
        let toml = r#"
[[devices]]
id = "a"
name = "A"
topic = "t/a"

[[devices]]
id = "a"
name = "Also A"
topic = "t/b"
"#;
        assert!(ConfigLoader::load_from_str(toml, ConfigFormat::Toml).is_err());
    }
}
