//! Strain sample decoding from 0x30 full reports

use ringcon_transport::InboundReport;

use crate::error::RingConError;

/// Payload offset of the Ring-Con strain value (little-endian i16)
pub const STRAIN_OFFSET: usize = 38;

/// Shortest payload that carries a strain value
pub const MIN_TELEMETRY_LEN: usize = STRAIN_OFFSET + 2;

/// Read the signed strain value from a telemetry report
///
/// Positive values are the ring pulled apart, negative values squeezed;
/// the resting value varies per unit and is found by calibration.
pub fn extract_strain(report: &InboundReport) -> Result<i16, RingConError> {
    let bytes = report
        .payload
        .get(STRAIN_OFFSET..MIN_TELEMETRY_LEN)
        .ok_or(RingConError::MalformedReport {
            report_id: report.report_id,
            len: report.payload.len(),
            needed: MIN_TELEMETRY_LEN,
        })?;
    Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
}
