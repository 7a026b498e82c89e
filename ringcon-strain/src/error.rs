//! Ring-Con error types

use ringcon_transport::TransportError;
use thiserror::Error;

use crate::sink::SinkError;

/// Errors from Ring-Con operations
#[derive(Error, Debug)]
pub enum RingConError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A command's acknowledgment did not arrive in time
    #[error("{message}")]
    Timeout { step: &'static str, message: String },

    /// The accessory probe went unanswered: no Ring-Con on the rail
    #[error("{message}")]
    AccessoryNotFound { message: String },

    /// A report too short for the field being read
    #[error("Malformed report 0x{report_id:02X}: {len} bytes, need {needed}")]
    MalformedReport {
        report_id: u8,
        len: usize,
        needed: usize,
    },

    /// Key output failed
    #[error("Key sink error: {0}")]
    Sink(#[from] SinkError),
}
