//! Device registry
//!
//! Owns the device list behind a read/write lock. The dispatch path only
//! ever takes cheap read snapshots; mutation comes from the configuration
//! surface and is rare.

use contracts::Device;
use parking_lot::RwLock;
use tracing::info;

/// Shared, mutable collection of configured devices
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: RwLock<Vec<Device>>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices: RwLock::new(devices),
        }
    }

    /// Cloned snapshot of every enabled device
    ///
    /// The dispatch cycle works exclusively on this snapshot; registry
    /// mutations mid-cycle do not affect tasks already spawned.
    pub fn enabled_devices(&self) -> Vec<Device> {
        self.devices
            .read()
            .iter()
            .filter(|d| d.enabled)
            .cloned()
            .collect()
    }

    /// Cloned snapshot of every device, enabled or not
    pub fn all(&self) -> Vec<Device> {
        self.devices.read().clone()
    }

    /// Look up a single device by id
    pub fn get(&self, id: &str) -> Option<Device> {
        self.devices.read().iter().find(|d| d.id == id).cloned()
    }

    /// Add a device; replaces any existing device with the same id
    pub fn upsert(&self, device: Device) {
        let mut devices = self.devices.write();
        match devices.iter_mut().find(|d| d.id == device.id) {
            Some(slot) => {
                info!(device = %device.id, "device updated");
                *slot = device;
            }
            None => {
                info!(device = %device.id, "device added");
                devices.push(device);
            }
        }
    }

    /// Remove a device by id; returns whether anything was removed
    pub fn remove(&self, id: &str) -> bool {
        let mut devices = self.devices.write();
        let before = devices.len();
        devices.retain(|d| d.id != id);
        let removed = devices.len() < before;
        if removed {
            info!(device = %id, "device removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DeviceMode, DeviceType, FrequencyRange, Rgb};

    fn device(id: &str, enabled: bool) -> Device {
        Device {
            id: id.into(),
            name: id.to_uppercase(),
            topic: format!("lights/{id}"),
            device_type: DeviceType::Zigbee,
            enabled,
            mode: DeviceMode::Reactive,
            flash_colour: Rgb::new(255, 0, 0),
            flash_random: false,
            brightness: 155,
            freq_ranges: vec![FrequencyRange::FULL_SPECTRUM],
        }
    }

    #[test]
    fn test_enabled_snapshot_skips_disabled() {
        let registry = DeviceRegistry::new(vec![device("a", true), device("b", false)]);
        let snapshot = registry.enabled_devices();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "a");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_upsert_replaces_by_id() {
        let registry = DeviceRegistry::new(vec![device("a", true)]);
        let mut replacement = device("a", true);
        replacement.name = "Renamed".into();
        registry.upsert(replacement);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().name, "Renamed");
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let registry = DeviceRegistry::new(vec![device("a", true)]);
        assert!(!registry.remove("nope"));
        assert!(registry.remove("a"));
        assert!(registry.is_empty());
    }
}
