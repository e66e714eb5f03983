//! Configuration validation
//!
//! Validation rules:
//! - device ids unique and non-empty
//! - frequency ranges: min <= max, both >= 0, at least one range per device
//! - brightness within 1..=255 (u8 upper bound is structural)
//! - broker host non-empty, port != 0
//! - audio buffer_size/sample_rate/channels > 0
//! - min_publish_interval/flash_duration >= 0, worker_pool > 0

use std::collections::HashSet;

use contracts::{AppBlueprint, ContractError};

/// Validate an AppBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &AppBlueprint) -> Result<(), ContractError> {
    validate_broker(blueprint)?;
    validate_audio(blueprint)?;
    validate_app(blueprint)?;
    validate_device_ids(blueprint)?;
    validate_devices(blueprint)?;
    Ok(())
}

/// Validate broker endpoint
fn validate_broker(blueprint: &AppBlueprint) -> Result<(), ContractError> {
    if blueprint.broker.host.is_empty() {
        return Err(ContractError::config_validation(
            "broker.host",
            "broker host cannot be empty",
        ));
    }
    if blueprint.broker.port == 0 {
        return Err(ContractError::config_validation(
            "broker.port",
            "broker port must be a valid TCP port",
        ));
    }
    Ok(())
}

/// Validate audio capture settings
fn validate_audio(blueprint: &AppBlueprint) -> Result<(), ContractError> {
    let audio = &blueprint.audio;
    if audio.buffer_size == 0 {
        return Err(ContractError::config_validation(
            "audio.buffer_size",
            "buffer_size must be > 0",
        ));
    }
    if audio.sample_rate == 0 {
        return Err(ContractError::config_validation(
            "audio.sample_rate",
            "sample_rate must be > 0",
        ));
    }
    if audio.channels == 0 {
        return Err(ContractError::config_validation(
            "audio.channels",
            "channels must be > 0",
        ));
    }
    if audio.min_volume < 0.0 {
        return Err(ContractError::config_validation(
            "audio.min_volume",
            format!("min_volume must be >= 0, got {}", audio.min_volume),
        ));
    }
    Ok(())
}

/// Validate dispatch settings
fn validate_app(blueprint: &AppBlueprint) -> Result<(), ContractError> {
    let app = &blueprint.app;
    if app.min_publish_interval < 0.0 {
        return Err(ContractError::config_validation(
            "app.min_publish_interval",
            format!(
                "min_publish_interval must be >= 0, got {}",
                app.min_publish_interval
            ),
        ));
    }
    if app.flash_duration < 0.0 {
        return Err(ContractError::config_validation(
            "app.flash_duration",
            format!("flash_duration must be >= 0, got {}", app.flash_duration),
        ));
    }
    if app.worker_pool == 0 {
        return Err(ContractError::config_validation(
            "app.worker_pool",
            "worker_pool must be > 0",
        ));
    }
    Ok(())
}

/// Validate device id uniqueness
fn validate_device_ids(blueprint: &AppBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for device in &blueprint.devices {
        if device.id.is_empty() {
            return Err(ContractError::config_validation(
                "devices[].id",
                "device id cannot be empty",
            ));
        }
        if !seen.insert(&device.id) {
            return Err(ContractError::config_validation(
                format!("devices[id={}]", device.id),
                "duplicate device id",
            ));
        }
    }
    Ok(())
}

/// Validate per-device fields
fn validate_devices(blueprint: &AppBlueprint) -> Result<(), ContractError> {
    for device in &blueprint.devices {
        if device.topic.is_empty() {
            return Err(ContractError::config_validation(
                format!("devices[{}].topic", device.id),
                "topic cannot be empty",
            ));
        }
        if device.brightness == 0 {
            return Err(ContractError::config_validation(
                format!("devices[{}].brightness", device.id),
                "brightness must be within 1..=255",
            ));
        }
        if device.freq_ranges.is_empty() {
            return Err(ContractError::config_validation(
                format!("devices[{}].freq_ranges", device.id),
                "at least one frequency range is required",
            ));
        }
        for (idx, range) in device.freq_ranges.iter().enumerate() {
            if range.min < 0.0 || range.max < 0.0 {
                return Err(ContractError::config_validation(
                    format!("devices[{}].freq_ranges[{idx}]", device.id),
                    format!("bounds must be >= 0, got {}..{}", range.min, range.max),
                ));
            }
            if range.min > range.max {
                return Err(ContractError::config_validation(
                    format!("devices[{}].freq_ranges[{idx}]", device.id),
                    format!("min ({}) must be <= max ({})", range.min, range.max),
                ));
            }
        }
    }
    Ok(())
}
