//! Ring-Con strain sensing on top of a Joy-Con (R) report channel
//!
//! This crate turns raw reports into key taps: it brings the Ring-Con up
//! with a fixed sub-command handshake, captures the neutral strain value,
//! then classifies every telemetry sample with a latched threshold
//! detector.

pub mod calibration;
pub mod classifier;
pub mod error;
pub mod init;
pub mod sequencer;
pub mod session;
pub mod sink;
pub mod strain;

pub use calibration::{await_baseline, Baseline};
pub use classifier::{DirectionalEvent, StrainClassifier, MARGIN, RADIUS};
pub use error::RingConError;
pub use init::{InitStep, InitializationSequence};
pub use sequencer::{execute, CommandSpec, ResponseMatcher, TimeoutKind};
pub use session::{process_report, RingConSession, SessionConfig, StreamStats};
pub use sink::{KeySink, SinkError};
pub use strain::extract_strain;

// Re-export the transport so binaries need only this crate
pub use ringcon_transport;
