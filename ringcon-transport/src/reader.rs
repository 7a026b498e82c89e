//! Input report reader and broadcast plumbing
//!
//! The controller pushes input reports continuously (0x30 at ~60Hz once
//! streaming). A dedicated thread reads them from hidapi and fans them out
//! on a broadcast channel; every subscriber sees every report in arrival
//! order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hidapi::HidDevice;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::protocol::INPUT_BUFFER_SIZE;
use crate::types::InboundReport;

/// Broadcast channel capacity for input reports
pub(crate) const REPORT_CHANNEL_CAPACITY: usize = 256;

/// Configuration for the report reader loop
#[derive(Clone)]
pub struct ReaderConfig {
    /// Read timeout in milliseconds (for checking shutdown flag when idle)
    pub read_timeout_ms: i32,
    /// Sleep duration on error before retrying
    pub error_sleep_ms: u64,
    /// Consecutive read errors after which the device is considered gone
    pub max_consecutive_errors: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            read_timeout_ms: 10,
            error_sleep_ms: 100,
            max_consecutive_errors: 20,
        }
    }
}

/// Read input reports until shutdown and broadcast each to subscribers
///
/// The loop owns the only strong sender. Returning drops it, which closes
/// the channel; subscribers then observe `RecvError::Closed`.
pub fn run_report_reader_loop(
    input_device: HidDevice,
    tx: broadcast::Sender<InboundReport>,
    shutdown: Arc<AtomicBool>,
    config: ReaderConfig,
) {
    debug!("Report reader thread started");
    let mut buf = [0u8; INPUT_BUFFER_SIZE];
    let mut consecutive_errors = 0u32;

    while !shutdown.load(Ordering::Relaxed) {
        match input_device.read_timeout(&mut buf, config.read_timeout_ms) {
            Ok(len) if len > 0 => {
                consecutive_errors = 0;
                if let Some(report) = InboundReport::from_raw(&buf[..len]) {
                    debug!(
                        "Report 0x{:02X} ({} bytes): {:02X?}",
                        report.report_id,
                        len,
                        &buf[..len.min(16)]
                    );
                    // No receivers is fine: nobody is waiting right now
                    let _ = tx.send(report);
                }
            }
            Ok(_) => {
                // Timeout, no data - loop continues to check shutdown
            }
            Err(e) => {
                consecutive_errors += 1;
                warn!("Report reader error: {}", e);
                if consecutive_errors >= config.max_consecutive_errors {
                    warn!(
                        "Report reader giving up after {} consecutive errors",
                        consecutive_errors
                    );
                    break;
                }
                std::thread::sleep(Duration::from_millis(config.error_sleep_ms));
            }
        }
    }

    debug!("Report reader thread exiting");
}

/// Receive the next report, riding over broadcast lag
///
/// A lagging receiver skips the reports it missed and keeps going; a
/// closed channel means the device is gone.
pub async fn recv_report(
    rx: &mut broadcast::Receiver<InboundReport>,
) -> Result<InboundReport, TransportError> {
    loop {
        match rx.recv().await {
            Ok(report) => return Ok(report),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                debug!("Report receiver lagged by {} reports", n);
            }
            Err(broadcast::error::RecvError::Closed) => return Err(TransportError::Disconnected),
        }
    }
}
