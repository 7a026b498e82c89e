//! Transport abstraction layer for Joy-Con (R) report communication
//!
//! The controller speaks in whole HID reports: the host sends output
//! reports (sub-commands) and the controller answers and streams through
//! input reports. This crate moves those reports and nothing more; what
//! the bytes mean lives in `ringcon-strain`.
//!
//! - HID (hidapi, usually a Bluetooth hidraw node)
//! - In-memory (scripted, for tests and replay)

pub mod device_registry;
pub mod error;
pub mod protocol;
pub mod reader;
pub mod types;

mod discovery;
mod hid_channel;
mod memory;

pub use device_registry::{is_supported, PID_JOYCON_R, VENDOR_ID};
pub use discovery::HidDiscovery;
pub use error::TransportError;
pub use hid_channel::HidReportChannel;
pub use memory::{MemoryChannel, Responder};
pub use reader::{recv_report, ReaderConfig};
pub use types::{DiscoveredDevice, InboundReport, OutboundReport, TransportDeviceInfo};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// The core report channel trait - all backends implement this
///
/// Inbound reports are fanned out to every live subscriber. Subscribing
/// registers a listener; dropping the returned receiver deregisters it.
#[async_trait]
pub trait ReportChannel: Send + Sync {
    /// Send one output report
    ///
    /// # Arguments
    /// * `report_id` - Output report ID (e.g. `protocol::report_id::SUBCOMMAND`)
    /// * `payload` - Report bytes after the ID
    async fn send_report(&self, report_id: u8, payload: &[u8]) -> Result<(), TransportError>;

    /// Subscribe to inbound reports
    ///
    /// Only reports arriving after the call are delivered. If the device is
    /// already gone the receiver reports `Closed` immediately.
    fn subscribe(&self) -> broadcast::Receiver<InboundReport>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;
}

/// Type alias for a shared report channel
pub type BoxedChannel = Arc<dyn ReportChannel>;

/// A receiver that is already closed, for channels whose device is gone
pub(crate) fn closed_receiver() -> broadcast::Receiver<InboundReport> {
    let (_, rx) = broadcast::channel(1);
    rx
}
