//! HID report channel over hidapi

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hidapi::HidDevice;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol::{self, report_id};
use crate::reader::{run_report_reader_loop, ReaderConfig, REPORT_CHANNEL_CAPACITY};
use crate::types::{InboundReport, TransportDeviceInfo};
use crate::{closed_receiver, ReportChannel};

/// Report channel for a Joy-Con opened through hidapi
///
/// The controller exposes a single HID interface, so it is opened twice:
/// one handle for writes, one owned by the reader thread. hidraw delivers
/// every input report to each open handle.
pub struct HidReportChannel {
    /// Handle used for output reports
    output_device: Mutex<HidDevice>,
    /// Device information
    info: TransportDeviceInfo,
    /// Weak handle to the broadcast channel; the reader thread owns the
    /// strong sender, so the channel closes when the thread exits
    report_tx: broadcast::WeakSender<InboundReport>,
    /// Shutdown flag for reader thread
    shutdown: Arc<AtomicBool>,
}

impl HidReportChannel {
    /// Create a channel from two handles to the same device
    ///
    /// # Arguments
    /// * `output_device` - Handle for output reports
    /// * `input_device` - Handle moved into the reader thread
    /// * `info` - Device information
    pub fn new(
        output_device: HidDevice,
        input_device: HidDevice,
        info: TransportDeviceInfo,
    ) -> Result<Self, TransportError> {
        Self::with_reader_config(output_device, input_device, info, ReaderConfig::default())
    }

    /// Create a channel with custom reader timing
    pub fn with_reader_config(
        output_device: HidDevice,
        input_device: HidDevice,
        info: TransportDeviceInfo,
        config: ReaderConfig,
    ) -> Result<Self, TransportError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (tx, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);
        let report_tx = tx.downgrade();
        let shutdown_clone = shutdown.clone();

        std::thread::Builder::new()
            .name("hid-report-reader".into())
            .spawn(move || {
                run_report_reader_loop(input_device, tx, shutdown_clone, config);
            })
            .map_err(|e| TransportError::Internal(format!("spawn report reader: {e}")))?;

        Ok(Self {
            output_device: Mutex::new(output_device),
            info,
            report_tx,
            shutdown,
        })
    }
}

#[async_trait]
impl ReportChannel for HidReportChannel {
    async fn send_report(&self, report_id: u8, payload: &[u8]) -> Result<(), TransportError> {
        let buf = protocol::frame_report(report_id, payload);
        debug!(
            "Sending {} report 0x{:02X}: {:02X?}",
            report_id::name(report_id),
            report_id,
            &buf[..buf.len().min(16)]
        );
        let device = self.output_device.lock();
        device.write(&buf)?;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<InboundReport> {
        match self.report_tx.upgrade() {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

impl Drop for HidReportChannel {
    fn drop(&mut self) {
        // Signal shutdown to reader thread
        self.shutdown.store(true, Ordering::SeqCst);
        debug!("HidReportChannel dropped, signaling reader shutdown");
    }
}
