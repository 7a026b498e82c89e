//! Key sinks: a uinput virtual keyboard and a log-only stand-in
//!
//! uinput events land in whichever window has focus, so the slide deck
//! (or anything else) in front receives the taps.

use evdev::{uinput::VirtualDevice, uinput::VirtualDeviceBuilder, AttributeSet, EventType, InputEvent};
use ringcon_strain::{DirectionalEvent, KeySink, SinkError};
use tracing::{debug, info};

use crate::config::{BoundKey, DriverConfig};

/// Which key each direction taps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: BoundKey,
    pub right: BoundKey,
}

impl KeyBindings {
    /// Bindings taken from the config
    pub fn from_config(config: &DriverConfig) -> Self {
        Self {
            left: config.left_key,
            right: config.right_key,
        }
    }

    /// Key bound to `event`
    pub fn key_for(&self, event: DirectionalEvent) -> BoundKey {
        match event {
            DirectionalEvent::Left => self.left,
            DirectionalEvent::Right => self.right,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_config(&DriverConfig::default())
    }
}

/// Virtual keyboard device
pub struct VirtualKeyboard {
    device: VirtualDevice,
    bindings: KeyBindings,
}

impl VirtualKeyboard {
    /// Create a new virtual keyboard exposing only the bound keys
    ///
    /// # Arguments
    /// * `name` - Device name (shown in `evtest`)
    /// * `bindings` - Keys tapped for each direction
    pub fn new(name: &str, bindings: KeyBindings) -> Result<Self, SinkError> {
        let mut keys = AttributeSet::<evdev::Key>::new();
        keys.insert(bindings.left.evdev_key());
        keys.insert(bindings.right.evdev_key());

        let device = VirtualDeviceBuilder::new()
            .map_err(SinkError::CreateDevice)?
            .name(name)
            .with_keys(&keys)
            .map_err(SinkError::CreateDevice)?
            .build()
            .map_err(SinkError::CreateDevice)?;

        Ok(Self { device, bindings })
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl KeySink for VirtualKeyboard {
    fn tap(&mut self, event: DirectionalEvent) -> Result<(), SinkError> {
        let key = self.bindings.key_for(event).evdev_key();

        // emit() appends SYN_REPORT, so press and release are separate frames
        self.device
            .emit(&[InputEvent::new(EventType::KEY, key.code(), 1)])
            .map_err(SinkError::EmitEvent)?;
        self.device
            .emit(&[InputEvent::new(EventType::KEY, key.code(), 0)])
            .map_err(SinkError::EmitEvent)?;

        debug!("Tapped {:?} for {}", key, event);
        Ok(())
    }
}

/// Sink for `--dry-run`: logs each tap, needs no uinput access
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    bindings: KeyBindings,
}

impl LogSink {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }
}

impl KeySink for LogSink {
    fn tap(&mut self, event: DirectionalEvent) -> Result<(), SinkError> {
        info!(
            "Key tap: {} (code {}) -> {}",
            event.key_name(),
            event.key_code(),
            self.bindings.key_for(event).display_name()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_follow_config() {
        let config = DriverConfig {
            left_key: BoundKey::PageUp,
            right_key: BoundKey::PageDown,
            ..DriverConfig::default()
        };
        let bindings = KeyBindings::from_config(&config);
        assert_eq!(bindings.key_for(DirectionalEvent::Left), BoundKey::PageUp);
        assert_eq!(bindings.key_for(DirectionalEvent::Right), BoundKey::PageDown);
    }

    #[test]
    fn test_log_sink_never_fails() {
        let mut sink = LogSink::default();
        assert!(sink.tap(DirectionalEvent::Left).is_ok());
        assert!(sink.tap(DirectionalEvent::Right).is_ok());
    }

    #[test]
    #[ignore] // Requires uinput access (run with: cargo test -- --ignored)
    fn test_create_keyboard_and_tap() {
        let mut keyboard =
            VirtualKeyboard::new("Test Ring-Con Keyboard", KeyBindings::default()).unwrap();
        keyboard.tap(DirectionalEvent::Right).unwrap();
    }
}
