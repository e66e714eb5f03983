//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{AppBlueprint, DeviceMode};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    broker: String,
    device_count: usize,
    enabled_count: usize,
    flash_count: usize,
    sample_rate: u32,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            let enabled_count = blueprint.devices.iter().filter(|d| d.enabled).count();
            let flash_count = blueprint
                .devices
                .iter()
                .filter(|d| d.mode == DeviceMode::Flash)
                .count();

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    broker: format!("{}:{}", blueprint.broker.host, blueprint.broker.port),
                    device_count: blueprint.devices.len(),
                    enabled_count,
                    flash_count,
                    sample_rate: blueprint.audio.sample_rate,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &AppBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.devices.is_empty() {
        warnings.push("No devices configured - beats will drive nothing".to_string());
    } else if blueprint.devices.iter().all(|d| !d.enabled) {
        warnings.push("All devices are disabled".to_string());
    }

    if blueprint.app.min_publish_interval == 0.0 {
        warnings.push(
            "min_publish_interval is 0 - every beat publishes, expect high broker load"
                .to_string(),
        );
    }

    for device in &blueprint.devices {
        if device.mode == DeviceMode::Flash
            && blueprint.app.flash_duration < blueprint.app.min_publish_interval
        {
            warnings.push(format!(
                "Device '{}': flash_duration is shorter than min_publish_interval, flashes may overlap their off commands",
                device.id
            ));
            break;
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Broker: {}", summary.broker);
            println!("  Devices: {} ({} enabled)", summary.device_count, summary.enabled_count);
            println!("  Flash devices: {}", summary.flash_count);
            println!("  Sample rate: {} Hz", summary.sample_rate);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args_for(path: &std::path::Path) -> ValidateArgs {
        ValidateArgs {
            config: path.to_path_buf(),
            json: false,
        }
    }

    #[test]
    fn test_missing_file_is_invalid() {
        let args = args_for(std::path::Path::new("does-not-exist.toml"));
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }

    #[test]
    fn test_valid_config_summary() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(
            file,
            r#"
[[devices]]
id = "strip"
name = "Strip"
topic = "lights/strip"
mode = "flash"
"#
        )
        .unwrap();

        let result = validate_config(&args_for(file.path()));
        assert!(result.valid);
        let summary = result.summary.unwrap();
        assert_eq!(summary.device_count, 1);
        assert_eq!(summary.flash_count, 1);
        assert_eq!(summary.broker, "localhost:1883");
    }

    #[test]
    fn test_empty_devices_warns() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        write!(file, "[broker]\nhost = \"broker.local\"\n").unwrap();

        let result = validate_config(&args_for(file.path()));
        assert!(result.valid);
        assert!(result.warnings.unwrap()[0].contains("No devices"));
    }
}
