//! Protocol-specific command payload rendering.
//!
//! Tasmota devices take a semicolon-chained `Backlog` command string,
//! zigbee2mqtt devices take a JSON object. Unknown device types only ever
//! receive the safe off payload.

use contracts::{DeviceType, Rgb};
use serde_json::json;

/// Near-instant transition for zigbee lights, in seconds
const ZIGBEE_TRANSITION: f64 = 0.0001;

/// Warm-white colour temperature used for the neutral reset, in mireds
const NEUTRAL_CT: u16 = 500;

/// What a device should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightCommand {
    /// Light up in a colour
    On { colour: Rgb },
    /// Warm neutral white, used when the show ends
    Neutral,
    /// Turn off
    Off,
}

/// Render a command into the payload string for the device's protocol
pub fn render(device_type: DeviceType, command: LightCommand, brightness: u8) -> String {
    match device_type {
        DeviceType::Tasmota => render_tasmota(command, brightness),
        DeviceType::Zigbee => render_zigbee(command, brightness),
        // A type we cannot drive only gets turned off, never on.
        DeviceType::Unknown => render_zigbee(LightCommand::Off, brightness),
    }
}

/// Tasmota brightness is a 1..=100 dimmer percentage
fn dimmer_percent(brightness: u8) -> u8 {
    let percent = (f32::from(brightness) / 255.0 * 100.0).round() as u8;
    percent.clamp(1, 100)
}

fn render_tasmota(command: LightCommand, brightness: u8) -> String {
    match command {
        LightCommand::On { colour } => format!(
            "NoDelay;Fade 0;NoDelay;Speed 1;NoDelay;Dimmer {};NoDelay;Color2 {},{},{}",
            dimmer_percent(brightness),
            colour.r,
            colour.g,
            colour.b
        ),
        LightCommand::Neutral => format!(
            "NoDelay;Fade 0;NoDelay;Speed 1;NoDelay;Power1 ON;NoDelay;Dimmer {};NoDelay;CT {NEUTRAL_CT}",
            dimmer_percent(brightness)
        ),
        LightCommand::Off => "NoDelay;Power1 OFF".to_owned(),
    }
}

fn render_zigbee(command: LightCommand, brightness: u8) -> String {
    let value = match command {
        LightCommand::On { colour } => json!({
            "state": "ON",
            "brightness": brightness,
            "transition": ZIGBEE_TRANSITION,
            "color": { "rgb": colour.to_string() },
        }),
        LightCommand::Neutral => json!({
            "state": "ON",
            "brightness": brightness,
            "transition": ZIGBEE_TRANSITION,
            "color_temp": NEUTRAL_CT,
        }),
        LightCommand::Off => json!({
            "state": "OFF",
            "transition": ZIGBEE_TRANSITION,
        }),
    };
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasmota_on_chains_colour_and_dimmer() {
        let payload = render(
            DeviceType::Tasmota,
            LightCommand::On {
                colour: Rgb::new(255, 102, 0),
            },
            155,
        );
        assert!(payload.contains("Color2 255,102,0"));
        assert!(payload.contains("Dimmer 61"));
        assert!(payload.starts_with("NoDelay;Fade 0"));
    }

    #[test]
    fn test_dimmer_clamps_to_one() {
        // brightness 1 rounds to 0%, which tasmota treats as unchanged
        assert_eq!(dimmer_percent(1), 1);
        assert_eq!(dimmer_percent(255), 100);
    }

    #[test]
    fn test_zigbee_on_payload() {
        let payload = render(
            DeviceType::Zigbee,
            LightCommand::On {
                colour: Rgb::new(5, 0, 255),
            },
            200,
        );
        let v: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(v["state"], "ON");
        assert_eq!(v["brightness"], 200);
        assert_eq!(v["color"]["rgb"], "5,0,255");
    }

    #[test]
    fn test_zigbee_off_has_no_colour() {
        let payload = render(DeviceType::Zigbee, LightCommand::Off, 155);
        let v: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(v["state"], "OFF");
        assert!(v.get("color").is_none());
        assert!(v.get("brightness").is_none());
    }

    #[test]
    fn test_neutral_uses_colour_temp() {
        let payload = render(DeviceType::Zigbee, LightCommand::Neutral, 155);
        let v: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(v["color_temp"], 500);
        assert_eq!(v["state"], "ON");
    }

    #[test]
    fn test_unknown_type_only_turns_off() {
        let payload = render(
            DeviceType::Unknown,
            LightCommand::On {
                colour: Rgb::new(255, 0, 0),
            },
            155,
        );
        let v: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(v["state"], "OFF");
    }
}
