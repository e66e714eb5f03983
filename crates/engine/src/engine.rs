//! Reactive dispatch engine.
//!
//! Consumes beat events in order, sweeps expired flashes, then fans out to
//! every enabled device concurrently. Each device decision is a spawned
//! task gated by the worker semaphore; one slow broker round-trip never
//! delays the other devices or the next beat.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_channel::Receiver;
use contracts::{
    BeatEvent, Device, DeviceMode, DeviceState, DeviceStateEvent, EngineSettings,
    NotificationSink, PublishSink, QosClass, Rgb, SettingsHandle,
};
use observability::{BeatAggregator, BeatSummary};
use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::flash::FlashTracker;
use crate::limiter::RateLimiter;
use crate::payload::{self, LightCommand};
use crate::registry::DeviceRegistry;
use crate::selector;
use crate::stats::{EngineStats, EngineStatsSnapshot};

/// Dispatch engine, cheaply cloneable
pub struct ReactiveEngine<P, N> {
    inner: Arc<EngineInner<P, N>>,
}

impl<P, N> Clone for ReactiveEngine<P, N> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct EngineInner<P, N> {
    registry: Arc<DeviceRegistry>,
    publisher: Arc<P>,
    notifier: Arc<N>,
    settings: Arc<SettingsHandle>,
    limiter: RateLimiter,
    flash: FlashTracker,
    colour_history: Mutex<HashMap<String, Rgb>>,
    workers: Semaphore,
    stats: EngineStats,
    aggregator: Mutex<BeatAggregator>,
}

impl<P, N> ReactiveEngine<P, N>
where
    P: PublishSink + Sync + Send + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(
        registry: Arc<DeviceRegistry>,
        publisher: Arc<P>,
        notifier: Arc<N>,
        settings: Arc<SettingsHandle>,
        worker_pool: usize,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                registry,
                publisher,
                notifier,
                settings,
                limiter: RateLimiter::new(),
                flash: FlashTracker::new(),
                colour_history: Mutex::new(HashMap::new()),
                workers: Semaphore::new(worker_pool.max(1)),
                stats: EngineStats::new(),
                aggregator: Mutex::new(BeatAggregator::new()),
            }),
        }
    }

    /// Current dispatch counters
    pub fn stats(&self) -> EngineStatsSnapshot {
        self.inner.stats.snapshot()
    }

    /// Frequency/volume distribution of the beats handled so far
    pub fn beat_summary(&self) -> BeatSummary {
        self.inner.aggregator.lock().summary()
    }

    /// The publish sink this engine dispatches through
    pub fn publisher(&self) -> Arc<P> {
        Arc::clone(&self.inner.publisher)
    }

    /// Consume beat events until the channel closes
    ///
    /// Device tasks are detached; they finish on their own schedule while
    /// the loop moves on to the next beat.
    pub async fn run(&self, rx: Receiver<BeatEvent>) {
        info!("dispatch engine started");
        while let Ok(event) = rx.recv().await {
            self.handle_beat(event).await;
        }
        info!("beat channel closed, dispatch engine stopped");
    }

    /// Process one beat: sweep flashes, then fan out to enabled devices.
    ///
    /// Returns the spawned device task handles so callers that need
    /// completion (tests, shutdown) can await them.
    #[instrument(
        level = "debug",
        name = "handle_beat",
        skip(self, event),
        fields(freq = event.frequency_hz, volume = event.volume)
    )]
    pub async fn handle_beat(&self, event: BeatEvent) -> Vec<JoinHandle<()>> {
        let settings = self.inner.settings.load();

        self.inner.stats.record_beat(event.frequency_hz);
        self.inner
            .aggregator
            .lock()
            .update(event.frequency_hz, event.volume);
        observability::record_beat(event.frequency_hz, event.volume);

        self.inner.sweep(event.at, &settings).await;

        let snapshot = self.inner.registry.enabled_devices();
        let mut handles = Vec::with_capacity(snapshot.len());
        for device in snapshot {
            let inner = Arc::clone(&self.inner);
            let settings = Arc::clone(&settings);
            handles.push(tokio::spawn(async move {
                // Beyond the pool size, tasks queue here instead of
                // piling onto the publisher.
                let Ok(_permit) = inner.workers.acquire().await else {
                    return;
                };
                inner.process_device(&device, event, &settings).await;
            }));
        }
        handles
    }

    /// Sweep expired flashes as of `now`
    pub async fn sweep_flashes(&self, now: Instant) {
        let settings = self.inner.settings.load();
        self.inner.sweep(now, &settings).await;
    }

    /// Turn every enabled device to neutral warm white
    ///
    /// Used at shutdown so the room is not left in the last beat's colour.
    pub async fn reset_to_neutral(&self) {
        for device in self.inner.registry.enabled_devices() {
            let payload = payload::render(device.device_type, LightCommand::Neutral, device.brightness);
            if let Err(error) = self
                .inner
                .publisher
                .publish(&device.topic, &payload, QosClass::AtMostOnce)
                .await
            {
                warn!(device = %device.id, %error, "neutral reset publish failed");
            }
        }
        info!("devices reset to neutral");
    }

    /// Drop all per-device state for a removed device
    pub fn forget_device(&self, device_id: &str) {
        self.inner.limiter.forget(device_id);
        self.inner.flash.forget(device_id);
        self.inner.colour_history.lock().remove(device_id);
    }
}

impl<P, N> EngineInner<P, N>
where
    P: PublishSink + Sync,
    N: NotificationSink,
{
    async fn process_device(&self, device: &Device, event: BeatEvent, settings: &EngineSettings) {
        if !device.reacts_to(event.frequency_hz) {
            if settings.debug {
                debug!(device = %device.id, freq = event.frequency_hz, "frequency outside ranges");
            }
            observability::record_dispatch_skip("frequency");
            return;
        }

        // The slot is reserved here, not after the publish, so concurrent
        // tasks for the same device cannot both pass.
        if !self
            .limiter
            .try_acquire(&device.id, event.at, settings.publish_interval())
        {
            if settings.debug {
                debug!(device = %device.id, "rate limited");
            }
            observability::record_dispatch_skip("rate_limit");
            return;
        }

        match device.mode {
            DeviceMode::Flash => self.dispatch_flash(device, event).await,
            DeviceMode::Reactive => self.dispatch_reactive(device, event).await,
        }
    }

    async fn dispatch_flash(&self, device: &Device, event: BeatEvent) {
        let (colour, colour_name) = if device.flash_random {
            let chosen = self.next_colour(&device.id);
            (chosen.rgb, Some(chosen.name.to_string()))
        } else {
            let name = selector::name_of(device.flash_colour).map(str::to_owned);
            (device.flash_colour, name)
        };

        let payload = payload::render(
            device.device_type,
            LightCommand::On { colour },
            device.brightness,
        );
        self.publish_on(device, &payload).await;

        // Armed even when the publish failed: the sweep's off command is
        // the recovery path for a light that did turn on.
        self.flash.arm(&device.id, event.at);

        debug!(device = %device.name, colour = %colour, "flash on");
        self.notifier.emit(DeviceStateEvent::lit(
            &device.id,
            &device.name,
            DeviceState::Flash,
            colour,
            colour_name,
            event.frequency_hz,
            event.volume,
        ));
    }

    async fn dispatch_reactive(&self, device: &Device, event: BeatEvent) {
        let chosen = self.next_colour(&device.id);
        let payload = payload::render(
            device.device_type,
            LightCommand::On { colour: chosen.rgb },
            device.brightness,
        );
        self.publish_on(device, &payload).await;

        debug!(device = %device.name, colour = %chosen.rgb, "reactive colour");
        self.notifier.emit(DeviceStateEvent::lit(
            &device.id,
            &device.name,
            DeviceState::On,
            chosen.rgb,
            Some(chosen.name.to_string()),
            event.frequency_hz,
            event.volume,
        ));
    }

    /// Pick the next colour for a device, avoiding its previous one
    fn next_colour(&self, device_id: &str) -> selector::Colour {
        let mut history = self.colour_history.lock();
        let chosen = selector::pick(history.get(device_id).copied());
        history.insert(device_id.to_owned(), chosen.rgb);
        chosen
    }

    /// On/colour publishes are fire-and-forget; a miss is cosmetic
    async fn publish_on(&self, device: &Device, payload: &str) {
        match self
            .publisher
            .publish(&device.topic, payload, QosClass::AtMostOnce)
            .await
        {
            Ok(()) => {
                self.stats.record_message();
                observability::record_publish(self.publisher.name(), true);
            }
            Err(error) => {
                observability::record_publish(self.publisher.name(), false);
                warn!(device = %device.id, %error, "publish failed");
            }
        }
    }

    /// Turn off every flash that has outlived the configured duration
    async fn sweep(&self, now: Instant, settings: &EngineSettings) {
        let lifetime = settings.flash_lifetime();
        for (device_id, started_at) in self.flash.expired(now, lifetime) {
            // A device removed after arming leaves its entry untouched.
            let Some(device) = self.registry.get(&device_id) else {
                continue;
            };

            // If a new beat re-armed this flash since we looked, leave it
            // on; the newer flash owns the state now.
            if !self.flash.disarm_if_unchanged(&device_id, started_at) {
                continue;
            }

            let payload = payload::render(device.device_type, LightCommand::Off, device.brightness);
            match self
                .publisher
                .publish(&device.topic, &payload, QosClass::ExactlyOnce)
                .await
            {
                Ok(()) => {
                    self.stats.record_flash_off();
                    observability::record_flash_off();
                    debug!(device = %device.name, "flash off");
                }
                Err(error) => {
                    warn!(device = %device.id, %error, "flash off publish failed");
                }
            }

            self.notifier.emit(DeviceStateEvent::off(&device.id, &device.name));
        }
    }
}
