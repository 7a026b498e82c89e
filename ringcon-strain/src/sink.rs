//! Key output port
//!
//! The classifier decides *which* direction fired; a `KeySink` decides how
//! that becomes a keystroke.

use thiserror::Error;

use crate::classifier::DirectionalEvent;

/// Errors from key output
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create virtual device: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit event: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Receives directional events and performs a key tap for each
///
/// A tap is a key-down immediately followed by a key-up; sinks never hold
/// a key down between calls.
pub trait KeySink {
    fn tap(&mut self, event: DirectionalEvent) -> Result<(), SinkError>;
}

/// Records events instead of pressing keys
impl KeySink for Vec<DirectionalEvent> {
    fn tap(&mut self, event: DirectionalEvent) -> Result<(), SinkError> {
        self.push(event);
        Ok(())
    }
}

impl<S: KeySink + ?Sized> KeySink for Box<S> {
    fn tap(&mut self, event: DirectionalEvent) -> Result<(), SinkError> {
        (**self).tap(event)
    }
}
