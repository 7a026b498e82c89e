//! Protocol constants and framing for Joy-Con report communication

/// HID report IDs used by the controller
pub mod report_id {
    /// Output: rumble data followed by a sub-command
    pub const SUBCOMMAND: u8 = 0x01;
    /// Input: sub-command reply (handshake acknowledgments)
    pub const SUBCOMMAND_REPLY: u8 = 0x21;
    /// Input: standard full report streamed at 60Hz (telemetry)
    pub const STANDARD_FULL: u8 = 0x30;

    /// Get human-readable name for a report ID
    pub fn name(id: u8) -> &'static str {
        match id {
            SUBCOMMAND => "SUBCOMMAND",
            SUBCOMMAND_REPLY => "SUBCOMMAND_REPLY",
            STANDARD_FULL => "STANDARD_FULL",
            _ => "UNKNOWN",
        }
    }
}

/// Bytes that precede the sub-command in a 0x01 output report
/// (packet counter plus 8 bytes of rumble data, all zero here)
pub const SUBCOMMAND_PREFIX_LEN: usize = 9;

/// Largest input report the controller sends (MCU reports, 0x31)
pub const INPUT_BUFFER_SIZE: usize = 362;

/// Build the payload of a 0x01 output report (without report ID)
///
/// Layout: `[00 x9, subcommand...]`
pub fn build_subcommand_payload(subcommand: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(SUBCOMMAND_PREFIX_LEN + subcommand.len());
    payload.resize(SUBCOMMAND_PREFIX_LEN, 0);
    payload.extend_from_slice(subcommand);
    payload
}

/// Prefix a payload with its report ID, as hidapi expects on write
pub fn frame_report(report_id: u8, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + 1);
    buf.push(report_id);
    buf.extend_from_slice(payload);
    buf
}
