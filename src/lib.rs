//! Ring-Con to key-tap driver for Linux
//!
//! Squeezing the Ring-Con taps one key, pulling it taps another. The
//! protocol work lives in `ringcon-strain`; this crate adds the config
//! file and the uinput keyboard.

pub mod config;
pub mod keyboard;

pub use config::{BoundKey, DriverConfig};
pub use keyboard::{KeyBindings, LogSink, VirtualKeyboard};
