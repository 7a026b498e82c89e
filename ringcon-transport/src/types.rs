//! Common types for transport layer

use std::sync::Arc;

/// One input report as delivered by the controller
///
/// The report ID is split off; `payload` holds the remaining bytes, so
/// payload offset 0 is the byte right after the ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundReport {
    /// HID report ID (e.g. 0x21 sub-command reply, 0x30 full report)
    pub report_id: u8,
    /// Report bytes after the ID
    pub payload: Arc<[u8]>,
}

impl InboundReport {
    /// Create a report from an ID and payload
    pub fn new(report_id: u8, payload: impl Into<Arc<[u8]>>) -> Self {
        Self {
            report_id,
            payload: payload.into(),
        }
    }

    /// Split a raw hidapi read buffer (`[id, payload...]`) into a report
    ///
    /// Returns `None` for an empty read.
    pub fn from_raw(data: &[u8]) -> Option<Self> {
        let (&report_id, payload) = data.split_first()?;
        Some(Self::new(report_id, payload))
    }
}

/// One output report as sent to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReport {
    /// HID report ID (0x01 for sub-commands)
    pub report_id: u8,
    /// Report bytes after the ID
    pub payload: Vec<u8>,
}

/// Device identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Whether the controller is paired over Bluetooth
    pub is_bluetooth: bool,
    /// Device path (hidraw node on Linux)
    pub device_path: String,
    /// Serial number if available (the controller's MAC over Bluetooth)
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_splits_report_id() {
        let report = InboundReport::from_raw(&[0x30, 0x01, 0x02, 0x03]).unwrap();
        assert_eq!(report.report_id, 0x30);
        assert_eq!(&report.payload[..], &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn test_from_raw_empty() {
        assert!(InboundReport::from_raw(&[]).is_none());
    }

    #[test]
    fn test_from_raw_id_only() {
        let report = InboundReport::from_raw(&[0x21]).unwrap();
        assert_eq!(report.report_id, 0x21);
        assert!(report.payload.is_empty());
    }
}
