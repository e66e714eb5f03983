//! Pipeline orchestrator - wires capture, detection, engine and sink.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_channel::Receiver;
use contracts::{AppBlueprint, BeatEvent, PublishSink, SettingsHandle};
use engine::{DeviceRegistry, ReactiveEngine};
use ingestion::{AudioPipeline, AudioSource, CpalSource};
use sinks::{LogNotifier, LogSink, MqttSink};
use tracing::{info, warn};

use super::PipelineStats;

use crate::error::CliError;

/// Pause between stopping capture and closing the beat channel, so beats
/// already in flight still reach the engine
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// How long the engine may take to drain after the channel closes
const ENGINE_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The application blueprint
    pub blueprint: AppBlueprint,

    /// Run duration (None = until interrupted)
    pub duration: Option<Duration>,

    /// Beat event channel capacity
    pub channel_capacity: usize,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,

    /// Log commands instead of publishing to the broker
    pub dry_run: bool,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline until `shutdown` resolves or the duration elapses
    pub async fn run(self, shutdown: impl Future<Output = ()>) -> Result<PipelineStats> {
        let start = Instant::now();
        let PipelineConfig {
            blueprint,
            duration,
            channel_capacity,
            metrics_port,
            dry_run,
        } = self.config;

        if let Some(port) = metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        let settings = Arc::new(SettingsHandle::new(blueprint.engine_settings()));
        let registry = Arc::new(DeviceRegistry::new(blueprint.devices.clone()));
        let device_count = registry.len();
        if registry.is_empty() {
            warn!("No devices configured - beats will drive nothing");
        }

        let detector = detection::create_detector(&blueprint.audio, Arc::clone(&settings));
        let source: Arc<dyn AudioSource> = Arc::new(CpalSource::new(blueprint.audio));
        let mut audio =
            AudioPipeline::new(source, detector, Arc::clone(&settings), channel_capacity);
        let rx = audio
            .take_receiver()
            .context("Beat receiver already taken")?;

        info!(
            devices = device_count,
            worker_pool = blueprint.app.worker_pool,
            rate = blueprint.audio.sample_rate,
            "Pipeline configured"
        );

        if dry_run {
            info!("Running in DRY-RUN mode (commands are logged, not published)");
            let publisher = Arc::new(LogSink::new("dry_run"));
            drive(
                audio,
                rx,
                registry,
                settings,
                publisher,
                blueprint.app.worker_pool,
                duration,
                shutdown,
                start,
                device_count,
            )
            .await
        } else {
            let (sink, event_loop) = MqttSink::connect(&blueprint.broker);
            let publisher = Arc::new(sink);
            let result = drive(
                audio,
                rx,
                registry,
                settings,
                publisher,
                blueprint.app.worker_pool,
                duration,
                shutdown,
                start,
                device_count,
            )
            .await;
            event_loop.abort();
            result
        }
    }
}

/// Start capture, run the engine loop, and shut everything down in order
#[allow(clippy::too_many_arguments)]
async fn drive<P>(
    audio: AudioPipeline,
    rx: Receiver<BeatEvent>,
    registry: Arc<DeviceRegistry>,
    settings: Arc<SettingsHandle>,
    publisher: Arc<P>,
    worker_pool: usize,
    duration: Option<Duration>,
    shutdown: impl Future<Output = ()>,
    start: Instant,
    device_count: usize,
) -> Result<PipelineStats>
where
    P: PublishSink + Send + Sync + 'static,
{
    let notifier = Arc::new(LogNotifier);
    let reactive = ReactiveEngine::new(registry, publisher, notifier, settings, worker_pool);

    audio
        .start()
        .map_err(|e| CliError::pipeline_execution(e.to_string()))?;

    let engine_task = {
        let reactive = reactive.clone();
        let rx = rx.clone();
        tokio::spawn(async move { reactive.run(rx).await })
    };

    info!("Pipeline running");

    match duration {
        Some(limit) => {
            tokio::select! {
                _ = tokio::time::sleep(limit) => {
                    info!(secs = limit.as_secs(), "Run duration elapsed");
                }
                _ = shutdown => {
                    warn!("Received shutdown signal, stopping pipeline...");
                }
            }
        }
        None => {
            shutdown.await;
            warn!("Received shutdown signal, stopping pipeline...");
        }
    }

    // Shutdown order: stop capture, drain in-flight beats, close the
    // channel so the engine loop exits, then reset the lights.
    audio.stop();
    tokio::time::sleep(DRAIN_GRACE).await;
    rx.close();
    if tokio::time::timeout(ENGINE_DRAIN_TIMEOUT, engine_task)
        .await
        .is_err()
    {
        warn!("Engine did not drain in time");
    }

    reactive.reset_to_neutral().await;

    Ok(PipelineStats {
        duration: start.elapsed(),
        ingestion: audio.metrics().snapshot(),
        engine: reactive.stats(),
        beats: reactive.beat_summary(),
        device_count,
    })
}
