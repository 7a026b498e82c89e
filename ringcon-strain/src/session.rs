//! Ring-Con session: bring-up, calibration, then streaming
//!
//! ```text
//! [ReportChannel] ─► initialize ─► await_baseline ─► signal_ready ─► stream
//!                                                                 │
//!                          0x30 report ─► extract_strain ─► StrainClassifier ─► KeySink
//! ```

use std::time::Duration;

use ringcon_transport::protocol::report_id;
use ringcon_transport::{recv_report, BoxedChannel, InboundReport, ReportChannel};
use tracing::{debug, info, warn};

use crate::calibration::{await_baseline, Baseline};
use crate::classifier::{DirectionalEvent, StrainClassifier};
use crate::error::RingConError;
use crate::init::InitializationSequence;
use crate::sequencer::DEFAULT_COMMAND_TIMEOUT;
use crate::sink::KeySink;
use crate::strain::extract_strain;

/// Session settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long each bring-up command waits for its acknowledgment
    pub command_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Counters kept while streaming
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Telemetry samples classified
    pub samples: u64,
    /// Events that fired
    pub events: u64,
    /// Short telemetry reports skipped
    pub malformed: u64,
    /// Events the sink failed to deliver
    pub sink_errors: u64,
}

/// One Ring-Con on one report channel
///
/// Holds the channel and settings only; calibration and latch state live
/// in the `StrainClassifier` that `start` returns.
pub struct RingConSession {
    channel: BoxedChannel,
    sequence: InitializationSequence,
}

impl RingConSession {
    /// Create a session
    pub fn new(channel: BoxedChannel, config: SessionConfig) -> Self {
        Self {
            channel,
            sequence: InitializationSequence::new(config.command_timeout),
        }
    }

    /// Bring the Ring-Con up and calibrate it
    ///
    /// Runs the handshake, waits for the neutral reading, then blinks the
    /// LEDs. Any failure aborts the whole start-up.
    pub async fn start(&self) -> Result<StrainClassifier, RingConError> {
        let info = self.channel.device_info();
        info!(
            "Starting Ring-Con session on {} ({:04x}:{:04x})",
            info.product_name.as_deref().unwrap_or("Unknown"),
            info.vid,
            info.pid
        );

        self.sequence.initialize(self.channel.as_ref()).await?;

        info!("Calibrating: leave the ring at rest");
        let baseline: Baseline = await_baseline(self.channel.as_ref()).await?;

        self.sequence.signal_ready(self.channel.as_ref()).await?;
        info!("Ready! Neutral strain value: {}", baseline);

        Ok(StrainClassifier::new(baseline))
    }

    /// Classify telemetry until the channel closes
    ///
    /// Only returns with an error: `Transport(Disconnected)` when the
    /// device goes away. Malformed reports and sink failures are logged and
    /// skipped.
    pub async fn stream<S>(
        &self,
        classifier: &mut StrainClassifier,
        sink: &mut S,
        stats: &mut StreamStats,
    ) -> Result<(), RingConError>
    where
        S: KeySink + ?Sized,
    {
        let mut rx = self.channel.subscribe();
        loop {
            let report = recv_report(&mut rx).await?;
            process_report(&report, classifier, sink, stats);
        }
    }
}

/// Handle one inbound report in the streaming phase
///
/// Returns the event that fired, if any.
pub fn process_report<S>(
    report: &InboundReport,
    classifier: &mut StrainClassifier,
    sink: &mut S,
    stats: &mut StreamStats,
) -> Option<DirectionalEvent>
where
    S: KeySink + ?Sized,
{
    if report.report_id != report_id::STANDARD_FULL {
        return None;
    }

    let sample = match extract_strain(report) {
        Ok(sample) => sample,
        Err(e) => {
            stats.malformed += 1;
            warn!("Skipping telemetry: {}", e);
            return None;
        }
    };
    stats.samples += 1;

    let event = classifier.observe(sample)?;
    stats.events += 1;
    debug!(
        "Strain {} (neutral {}) -> {}",
        sample,
        classifier.baseline(),
        event
    );
    if let Err(e) = sink.tap(event) {
        stats.sink_errors += 1;
        warn!("Failed to send {}: {}", event, e);
    }
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strain::STRAIN_OFFSET;

    fn telemetry(value: i16) -> InboundReport {
        let mut payload = vec![0u8; 48];
        payload[STRAIN_OFFSET..STRAIN_OFFSET + 2].copy_from_slice(&value.to_le_bytes());
        InboundReport::new(report_id::STANDARD_FULL, payload)
    }

    struct FailingSink;

    impl KeySink for FailingSink {
        fn tap(&mut self, _event: DirectionalEvent) -> Result<(), crate::sink::SinkError> {
            Err(crate::sink::SinkError::EmitEvent(std::io::Error::other(
                "uinput gone",
            )))
        }
    }

    #[test]
    fn test_process_report_end_to_end_stream() {
        let mut classifier = StrainClassifier::new(Baseline::new(500).unwrap());
        let mut sink: Vec<DirectionalEvent> = Vec::new();
        let mut stats = StreamStats::default();

        // -600 < 500 - 1024 = -524
        for value in [500, -600, -600, 500, -600] {
            process_report(&telemetry(value), &mut classifier, &mut sink, &mut stats);
        }

        assert_eq!(sink, vec![DirectionalEvent::Left, DirectionalEvent::Left]);
        assert_eq!(stats.samples, 5);
        assert_eq!(stats.events, 2);
    }

    #[test]
    fn test_process_report_ignores_non_telemetry() {
        let mut classifier = StrainClassifier::new(Baseline::new(500).unwrap());
        let mut sink: Vec<DirectionalEvent> = Vec::new();
        let mut stats = StreamStats::default();

        let mut reply = telemetry(-2000);
        reply.report_id = report_id::SUBCOMMAND_REPLY;
        assert!(process_report(&reply, &mut classifier, &mut sink, &mut stats).is_none());
        assert!(sink.is_empty());
        assert_eq!(stats, StreamStats::default());
    }

    #[test]
    fn test_process_report_counts_malformed() {
        let mut classifier = StrainClassifier::new(Baseline::new(500).unwrap());
        let mut sink: Vec<DirectionalEvent> = Vec::new();
        let mut stats = StreamStats::default();

        let short = InboundReport::new(report_id::STANDARD_FULL, vec![0u8; 10]);
        assert!(process_report(&short, &mut classifier, &mut sink, &mut stats).is_none());
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.samples, 0);
    }

    #[test]
    fn test_sink_failure_keeps_classifier_state() {
        let mut classifier = StrainClassifier::new(Baseline::new(500).unwrap());
        let mut sink = FailingSink;
        let mut stats = StreamStats::default();

        let event = process_report(&telemetry(3000), &mut classifier, &mut sink, &mut stats);
        assert_eq!(event, Some(DirectionalEvent::Right));
        assert_eq!(stats.sink_errors, 1);
        assert!(classifier.is_latched());
    }
}
