//! Device discovery for Joy-Con controllers

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid_channel::HidReportChannel;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};

/// Check if a device is connected via Bluetooth
fn is_bluetooth_bus(device_info: &hidapi::DeviceInfo) -> bool {
    matches!(device_info.bus_type(), hidapi::BusType::Bluetooth)
}

/// HID device discovery for the supported controllers
#[derive(Debug, Clone, Copy, Default)]
pub struct HidDiscovery;

impl HidDiscovery {
    /// Create a discovery instance for the supported controllers
    pub fn new() -> Self {
        Self
    }

    /// List currently available devices
    pub fn list_devices(&self) -> Result<Vec<DiscoveredDevice>, TransportError> {
        let api = HidApi::new()?;
        let mut devices = Vec::new();

        for device_info in api.device_list() {
            let vid = device_info.vendor_id();
            let pid = device_info.product_id();

            if !device_registry::is_supported(vid, pid) {
                continue;
            }

            let path = device_info.path().to_string_lossy().to_string();
            let is_bluetooth = is_bluetooth_bus(device_info);

            debug!(
                "Found device: VID={:04X} PID={:04X} bt={} path={}",
                vid, pid, is_bluetooth, path
            );

            devices.push(DiscoveredDevice {
                info: TransportDeviceInfo {
                    vid,
                    pid,
                    is_bluetooth,
                    device_path: path,
                    serial: device_info.serial_number().map(|s| s.to_string()),
                    product_name: device_info.product_string().map(|s| s.to_string()),
                },
            });
        }

        info!("Found {} devices", devices.len());
        Ok(devices)
    }

    /// Open a specific device
    pub fn open_device(&self, device: &DiscoveredDevice) -> Result<HidReportChannel, TransportError> {
        let api = HidApi::new()?;
        let path = std::ffi::CString::new(device.info.device_path.clone())
            .map_err(|e| TransportError::Internal(format!("invalid device path: {e}")))?;

        let output_device = api.open_path(&path)?;
        let input_device = api.open_path(&path)?;

        info!(
            "Opened {} ({:04X}:{:04X}) at {}",
            device_registry::model_name(device.info.pid),
            device.info.vid,
            device.info.pid,
            device.info.device_path
        );

        HidReportChannel::new(output_device, input_device, device.info.clone())
    }

    /// Open the first matching device
    ///
    /// Only one controller is driven at a time; extra matches are ignored.
    pub fn open_first(&self) -> Result<HidReportChannel, TransportError> {
        let devices = self.list_devices()?;
        let device = devices.first().ok_or_else(|| {
            TransportError::DeviceNotFound(format!(
                "no {} ({:04X}:{:04X}) connected",
                device_registry::model_name(device_registry::PID_JOYCON_R),
                device_registry::VENDOR_ID,
                device_registry::PID_JOYCON_R
            ))
        })?;

        if devices.len() > 1 {
            debug!("{} matching devices, using the first", devices.len());
        }

        self.open_device(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires hidraw access (run with: cargo test -- --ignored)
    fn test_list_devices() {
        let result = HidDiscovery::new().list_devices();
        assert!(result.is_ok());
    }
}
