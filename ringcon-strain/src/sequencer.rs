//! Send-and-await engine for Joy-Con sub-commands
//!
//! The controller is half-duplex: one sub-command may be outstanding at a
//! time, and it must be acknowledged (and given a moment to settle) before
//! the next goes out. `execute` implements one such exchange.
//!
//! ```text
//! subscribe ──► send 0x01 [00 x9, subcmd] ──► wait 0x21 matching ack ──► settle 50ms
//!                                   └── deadline passes ──► Timeout
//! ```

use std::fmt;
use std::time::Duration;

use ringcon_transport::protocol::{build_subcommand_payload, report_id};
use ringcon_transport::{recv_report, InboundReport, ReportChannel};
use tokio::time::Instant;
use tracing::debug;

use crate::error::RingConError;

/// Default time to wait for an acknowledgment
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(5000);

/// Pause after an acknowledgment before the controller takes another command
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Default timeout message for unanswered commands
pub const DEFAULT_TIMEOUT_MESSAGE: &str = "timeout.";

/// Required bytes of an acknowledgment payload
///
/// Offsets are 1-based against the payload (offset 1 is the byte right
/// after the report ID).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseMatcher {
    pairs: Vec<(usize, u8)>,
}

impl ResponseMatcher {
    /// Build from `(offset, value)` pairs
    pub fn new(pairs: &[(usize, u8)]) -> Self {
        Self {
            pairs: pairs.to_vec(),
        }
    }

    /// Check every pair against `payload`
    ///
    /// A payload too short to hold an offset does not match. Offset 0 never
    /// matches.
    pub fn matches(&self, payload: &[u8]) -> bool {
        self.pairs.iter().all(|&(offset, value)| {
            offset
                .checked_sub(1)
                .and_then(|i| payload.get(i))
                .is_some_and(|&b| b == value)
        })
    }
}

/// How an unanswered command is reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeoutKind {
    /// Plain `Timeout` with this message
    Timeout(String),
    /// `AccessoryNotFound` with this message
    AccessoryNotFound(String),
}

impl TimeoutKind {
    fn into_error(self, step: &'static str) -> RingConError {
        match self {
            TimeoutKind::Timeout(message) => RingConError::Timeout { step, message },
            TimeoutKind::AccessoryNotFound(message) => RingConError::AccessoryNotFound { message },
        }
    }
}

impl Default for TimeoutKind {
    fn default() -> Self {
        TimeoutKind::Timeout(DEFAULT_TIMEOUT_MESSAGE.to_string())
    }
}

/// One sub-command and the acknowledgment that completes it
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Step name for logs and errors
    pub name: &'static str,
    /// Sub-command bytes (placed after the 9-byte prefix)
    pub subcommand: Vec<u8>,
    /// What the 0x21 acknowledgment must contain
    pub matcher: ResponseMatcher,
    /// How long to wait for the acknowledgment
    pub timeout: Duration,
    /// Error reported when the acknowledgment never arrives
    pub on_timeout: TimeoutKind,
}

impl CommandSpec {
    /// Create a spec with the default timeout and message
    pub fn new(name: &'static str, subcommand: &[u8], matcher: &[(usize, u8)]) -> Self {
        Self {
            name,
            subcommand: subcommand.to_vec(),
            matcher: ResponseMatcher::new(matcher),
            timeout: DEFAULT_COMMAND_TIMEOUT,
            on_timeout: TimeoutKind::default(),
        }
    }

    /// Override the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override how a timeout is reported
    pub fn with_timeout_kind(mut self, kind: TimeoutKind) -> Self {
        self.on_timeout = kind;
        self
    }

    /// Whether `report` acknowledges this command
    ///
    /// Only sub-command replies (0x21) are considered; anything else, such
    /// as streamed 0x30 reports, is never an acknowledgment.
    pub fn is_acknowledged_by(&self, report: &InboundReport) -> bool {
        report.report_id == report_id::SUBCOMMAND_REPLY && self.matcher.matches(&report.payload)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02X?}", self.name, self.subcommand)
    }
}

/// Send `spec` and wait for its acknowledgment, then settle
///
/// Exactly one output report is sent and exactly one subscription is held
/// for the duration of the call; it is released on every exit path. There
/// are no retries.
pub async fn execute<C>(spec: &CommandSpec, channel: &C) -> Result<(), RingConError>
where
    C: ReportChannel + ?Sized,
{
    let mut rx = channel.subscribe();
    let deadline = Instant::now() + spec.timeout;

    debug!("Sending {}", spec);
    channel
        .send_report(
            report_id::SUBCOMMAND,
            &build_subcommand_payload(&spec.subcommand),
        )
        .await?;

    let wait_for_ack = async {
        loop {
            let report = recv_report(&mut rx).await?;
            if spec.is_acknowledged_by(&report) {
                return Ok::<_, RingConError>(report);
            }
            debug!(
                "{}: ignoring report 0x{:02X} while waiting for ack",
                spec.name, report.report_id
            );
        }
    };

    let outcome = tokio::time::timeout_at(deadline, wait_for_ack).await;
    match outcome {
        Ok(Ok(ack)) => {
            drop(rx);
            debug!(
                "{} acknowledged: {:02X?}",
                spec.name,
                &ack.payload[..ack.payload.len().min(16)]
            );
            tokio::time::sleep(SETTLE_DELAY).await;
            Ok(())
        }
        Ok(Err(e)) => Err(e),
        Err(_) => {
            debug!("{} timed out after {:?}", spec.name, spec.timeout);
            Err(spec.on_timeout.clone().into_error(spec.name))
        }
    }
}
