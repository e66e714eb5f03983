//! Configuration parsing
//!
//! Supports TOML (primary) and JSON (optional) formats.

use contracts::{AppBlueprint, ContractError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<AppBlueprint, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<AppBlueprint, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<AppBlueprint, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DeviceMode, DeviceType};

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[broker]
host = "10.0.0.2"
port = 1883

[audio]
buffer_size = 2048
sample_rate = 44100

[app]
min_publish_interval = 0.1
flash_duration = 0.3

[[devices]]
id = "desk"
name = "Desk Lamp"
topic = "zigbee2mqtt/desk/set"
type = "zigbee"
mode = "flash"
flash_colour = "255,0,0"

[[devices.freq_ranges]]
min = 20.0
max = 250.0
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.broker.host, "10.0.0.2");
        assert_eq!(bp.devices.len(), 1);
        assert_eq!(bp.devices[0].device_type, DeviceType::Zigbee);
        assert_eq!(bp.devices[0].mode, DeviceMode::Flash);
        assert_eq!(bp.devices[0].freq_ranges.len(), 1);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "broker": { "host": "localhost", "port": 1883 },
            "devices": [{
                "id": "strip",
                "name": "LED Strip",
                "topic": "cmnd/strip/Backlog",
                "type": "tasmota",
                "freq_ranges": [{ "min": 60.0, "max": 250.0 }]
            }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        assert_eq!(result.unwrap().devices[0].device_type, DeviceType::Tasmota);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ContractError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
