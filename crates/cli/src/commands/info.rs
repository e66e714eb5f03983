//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::AppBlueprint;
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::CliError;

/// Configuration info for JSON output
///
/// Deliberately omits broker credentials.
#[derive(Serialize)]
struct ConfigInfo {
    broker: BrokerInfo,
    audio: AudioInfo,
    app: AppInfo,
    devices: Vec<DeviceInfo>,
}

#[derive(Serialize)]
struct BrokerInfo {
    host: String,
    port: u16,
    client_id: String,
    authenticated: bool,
}

#[derive(Serialize)]
struct AudioInfo {
    sample_rate: u32,
    buffer_size: usize,
    channels: u16,
    min_volume: f32,
    beat_threshold: f32,
}

#[derive(Serialize)]
struct AppInfo {
    min_publish_interval: f64,
    flash_duration: f64,
    worker_pool: usize,
}

#[derive(Serialize)]
struct DeviceInfo {
    id: String,
    name: String,
    topic: String,
    device_type: String,
    mode: String,
    enabled: bool,
    brightness: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    freq_ranges: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint, args);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint, args);
    }

    Ok(())
}

fn build_config_info(blueprint: &AppBlueprint, args: &InfoArgs) -> ConfigInfo {
    let devices = blueprint
        .devices
        .iter()
        .map(|d| DeviceInfo {
            id: d.id.clone(),
            name: d.name.clone(),
            topic: d.topic.clone(),
            device_type: format!("{:?}", d.device_type),
            mode: format!("{:?}", d.mode),
            enabled: d.enabled,
            brightness: d.brightness,
            freq_ranges: if args.ranges {
                d.freq_ranges
                    .iter()
                    .map(|r| format!("{}-{} Hz", r.min, r.max))
                    .collect()
            } else {
                Vec::new()
            },
        })
        .collect();

    ConfigInfo {
        broker: BrokerInfo {
            host: blueprint.broker.host.clone(),
            port: blueprint.broker.port,
            client_id: blueprint.broker.client_id.clone(),
            authenticated: blueprint.broker.username.is_some(),
        },
        audio: AudioInfo {
            sample_rate: blueprint.audio.sample_rate,
            buffer_size: blueprint.audio.buffer_size,
            channels: blueprint.audio.channels,
            min_volume: blueprint.audio.min_volume,
            beat_threshold: blueprint.audio.beat_threshold,
        },
        app: AppInfo {
            min_publish_interval: blueprint.app.min_publish_interval,
            flash_duration: blueprint.app.flash_duration,
            worker_pool: blueprint.app.worker_pool,
        },
        devices,
    }
}

fn print_config_info(blueprint: &AppBlueprint, args: &InfoArgs) {
    println!("=== beatglow Configuration ===\n");

    println!("Broker");
    println!("  Host: {}:{}", blueprint.broker.host, blueprint.broker.port);
    println!("  Client id: {}", blueprint.broker.client_id);
    println!(
        "  Credentials: {}",
        if blueprint.broker.username.is_some() {
            "configured"
        } else {
            "none"
        }
    );

    println!("\nAudio");
    println!("  Sample rate: {} Hz", blueprint.audio.sample_rate);
    println!("  Buffer size: {} samples", blueprint.audio.buffer_size);
    println!("  Channels: {}", blueprint.audio.channels);
    println!("  Silence gate: {}", blueprint.audio.min_volume);
    println!("  Beat threshold: {}", blueprint.audio.beat_threshold);

    println!("\nDispatch");
    println!(
        "  Min publish interval: {}s",
        blueprint.app.min_publish_interval
    );
    println!("  Flash duration: {}s", blueprint.app.flash_duration);
    println!("  Worker pool: {}", blueprint.app.worker_pool);

    println!("\nDevices ({})", blueprint.devices.len());
    for device in &blueprint.devices {
        let state = if device.enabled { "" } else { " [disabled]" };
        println!(
            "  - {} ({:?}, {:?}) -> {}{}",
            device.id, device.device_type, device.mode, device.topic, state
        );
        if args.ranges {
            for range in &device.freq_ranges {
                println!("      {}-{} Hz", range.min, range.max);
            }
        }
    }

    println!();
}
