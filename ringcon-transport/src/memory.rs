//! In-memory report channel
//!
//! Stands in for a controller: records every output report and lets a
//! scripted responder answer with input reports. Reports can also be
//! injected directly, e.g. to feed telemetry.

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::error::TransportError;
use crate::reader::REPORT_CHANNEL_CAPACITY;
use crate::types::{InboundReport, OutboundReport, TransportDeviceInfo};
use crate::{closed_receiver, ReportChannel};

/// Produces the input reports a device would answer an output report with
pub type Responder = Box<dyn FnMut(&OutboundReport) -> Vec<InboundReport> + Send>;

/// Report channel backed by memory instead of a device
pub struct MemoryChannel {
    report_tx: Mutex<Option<broadcast::Sender<InboundReport>>>,
    sent: Mutex<Vec<OutboundReport>>,
    responder: Mutex<Option<Responder>>,
    info: TransportDeviceInfo,
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryChannel {
    /// Create a channel that never answers
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(REPORT_CHANNEL_CAPACITY);
        Self {
            report_tx: Mutex::new(Some(tx)),
            sent: Mutex::new(Vec::new()),
            responder: Mutex::new(None),
            info: TransportDeviceInfo {
                vid: crate::VENDOR_ID,
                pid: crate::PID_JOYCON_R,
                is_bluetooth: false,
                device_path: "memory".to_string(),
                serial: None,
                product_name: Some("In-memory Joy-Con (R)".to_string()),
            },
        }
    }

    /// Create a channel that answers each output report via `responder`
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&OutboundReport) -> Vec<InboundReport> + Send + 'static,
    {
        let channel = Self::new();
        *channel.responder.lock() = Some(Box::new(responder));
        channel
    }

    /// Deliver a report to every current subscriber
    ///
    /// Returns how many subscribers received it.
    pub fn inject(&self, report: InboundReport) -> usize {
        match self.report_tx.lock().as_ref() {
            Some(tx) => tx.send(report).unwrap_or(0),
            None => 0,
        }
    }

    /// Output reports sent so far, oldest first
    pub fn sent(&self) -> Vec<OutboundReport> {
        self.sent.lock().clone()
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.report_tx
            .lock()
            .as_ref()
            .map_or(0, |tx| tx.receiver_count())
    }

    /// Simulate the device going away: subscribers observe `Closed`
    pub fn close(&self) {
        self.report_tx.lock().take();
    }
}

#[async_trait]
impl ReportChannel for MemoryChannel {
    async fn send_report(&self, report_id: u8, payload: &[u8]) -> Result<(), TransportError> {
        if self.report_tx.lock().is_none() {
            return Err(TransportError::Disconnected);
        }

        let report = OutboundReport {
            report_id,
            payload: payload.to_vec(),
        };
        debug!("Memory channel got report 0x{:02X}", report_id);

        let replies = match self.responder.lock().as_mut() {
            Some(responder) => responder(&report),
            None => Vec::new(),
        };
        self.sent.lock().push(report);

        for reply in replies {
            self.inject(reply);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<InboundReport> {
        match self.report_tx.lock().as_ref() {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recv_report;

    #[tokio::test]
    async fn test_records_sent_reports() {
        let channel = MemoryChannel::new();
        channel.send_report(0x01, &[0xAA]).await.unwrap();
        channel.send_report(0x01, &[0xBB]).await.unwrap();

        let sent = channel.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].payload, vec![0xAA]);
        assert_eq!(sent[1].payload, vec![0xBB]);
    }

    #[tokio::test]
    async fn test_responder_replies_reach_subscribers() {
        let channel = MemoryChannel::with_responder(|out| {
            vec![InboundReport::new(0x21, out.payload.clone())]
        });
        let mut rx = channel.subscribe();
        channel.send_report(0x01, &[0x42]).await.unwrap();

        let reply = recv_report(&mut rx).await.unwrap();
        assert_eq!(reply.report_id, 0x21);
        assert_eq!(&reply.payload[..], &[0x42]);
    }

    #[tokio::test]
    async fn test_subscriber_count_tracks_drops() {
        let channel = MemoryChannel::new();
        assert_eq!(channel.subscriber_count(), 0);
        let rx = channel.subscribe();
        assert_eq!(channel.subscriber_count(), 1);
        drop(rx);
        assert_eq!(channel.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_close_disconnects() {
        let channel = MemoryChannel::new();
        let mut rx = channel.subscribe();
        channel.close();

        assert!(matches!(
            recv_report(&mut rx).await,
            Err(TransportError::Disconnected)
        ));
        assert!(matches!(
            channel.send_report(0x01, &[]).await,
            Err(TransportError::Disconnected)
        ));
        assert_eq!(channel.inject(InboundReport::new(0x30, vec![0])), 0);
    }
}
