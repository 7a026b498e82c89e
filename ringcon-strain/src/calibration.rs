//! Neutral baseline capture

use std::fmt;

use ringcon_transport::protocol::report_id;
use ringcon_transport::{recv_report, ReportChannel};
use tracing::{debug, info, warn};

use crate::error::RingConError;
use crate::strain::extract_strain;

/// Strain value of the ring at rest
///
/// Never zero: zero is what the controller reports before the Ring-Con has
/// produced its first reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline(i16);

impl Baseline {
    /// Wrap a reading; `None` for the zero sentinel
    pub fn new(value: i16) -> Option<Self> {
        (value != 0).then_some(Self(value))
    }

    /// The raw strain value
    pub fn value(&self) -> i16 {
        self.0
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wait for the first genuine strain reading and use it as neutral
///
/// There is no timeout: the call blocks until the Ring-Con reports a
/// non-zero value on a 0x30 report or the channel closes. Short telemetry
/// reports are skipped.
pub async fn await_baseline<C>(channel: &C) -> Result<Baseline, RingConError>
where
    C: ReportChannel + ?Sized,
{
    let mut rx = channel.subscribe();
    let mut skipped = 0u64;

    loop {
        let report = recv_report(&mut rx).await?;
        if report.report_id != report_id::STANDARD_FULL {
            continue;
        }

        let sample = match extract_strain(&report) {
            Ok(sample) => sample,
            Err(e) => {
                warn!("Skipping telemetry during calibration: {}", e);
                continue;
            }
        };

        if let Some(baseline) = Baseline::new(sample) {
            info!(
                "Calibrated neutral strain value: {} (after {} empty samples)",
                baseline, skipped
            );
            return Ok(baseline);
        }
        skipped += 1;
        if skipped % 60 == 0 {
            debug!("Still waiting for Ring-Con reading ({} empty samples)", skipped);
        }
    }
}
