//! Configuration for the Ring-Con driver
//!
//! Stored as TOML, by default at `~/.config/ringcon/driver.toml`.

use evdev::Key;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Keys a direction can be bound to
///
/// Arrow keys suit slide decks; PageUp/PageDown match most presentation
/// clickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundKey {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Space,
    Enter,
}

impl BoundKey {
    /// All bindable keys
    pub const ALL: &'static [BoundKey] = &[
        BoundKey::Left,
        BoundKey::Right,
        BoundKey::Up,
        BoundKey::Down,
        BoundKey::PageUp,
        BoundKey::PageDown,
        BoundKey::Space,
        BoundKey::Enter,
    ];

    /// The evdev key code emitted for this key
    pub fn evdev_key(&self) -> Key {
        match self {
            BoundKey::Left => Key::KEY_LEFT,
            BoundKey::Right => Key::KEY_RIGHT,
            BoundKey::Up => Key::KEY_UP,
            BoundKey::Down => Key::KEY_DOWN,
            BoundKey::PageUp => Key::KEY_PAGEUP,
            BoundKey::PageDown => Key::KEY_PAGEDOWN,
            BoundKey::Space => Key::KEY_SPACE,
            BoundKey::Enter => Key::KEY_ENTER,
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BoundKey::Left => "Left",
            BoundKey::Right => "Right",
            BoundKey::Up => "Up",
            BoundKey::Down => "Down",
            BoundKey::PageUp => "PageUp",
            BoundKey::PageDown => "PageDown",
            BoundKey::Space => "Space",
            BoundKey::Enter => "Enter",
        }
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Virtual keyboard name (shown in `evtest`)
    pub device_name: String,
    /// How long each handshake command waits for its acknowledgment
    pub command_timeout_ms: u64,
    /// Key tapped when the ring is squeezed
    pub left_key: BoundKey,
    /// Key tapped when the ring is pulled
    pub right_key: BoundKey,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            device_name: "Ring-Con Virtual Keyboard".to_string(),
            command_timeout_ms: 5000,
            left_key: BoundKey::Left,
            right_key: BoundKey::Right,
        }
    }
}

impl DriverConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ringcon")
            .join("driver.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DriverConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Per-command acknowledgment timeout
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binds_arrow_keys() {
        let config = DriverConfig::default();
        assert_eq!(config.left_key, BoundKey::Left);
        assert_eq!(config.right_key, BoundKey::Right);
        assert_eq!(config.command_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(DriverConfig::load(&path).unwrap(), DriverConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("driver.toml");

        let config = DriverConfig {
            left_key: BoundKey::PageUp,
            right_key: BoundKey::PageDown,
            command_timeout_ms: 1500,
            ..DriverConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = DriverConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driver.toml");
        std::fs::write(&path, "right_key = \"Space\"\n").unwrap();

        let config = DriverConfig::load(&path).unwrap();
        assert_eq!(config.right_key, BoundKey::Space);
        assert_eq!(config.left_key, BoundKey::Left);
        assert_eq!(config.command_timeout_ms, 5000);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driver.toml");
        std::fs::write(&path, "left_key = \"Escape\"\n").unwrap();
        assert!(DriverConfig::load(&path).is_err());
    }

    #[test]
    fn test_bound_keys_map_to_distinct_codes() {
        let mut codes: Vec<u16> = BoundKey::ALL.iter().map(|k| k.evdev_key().code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), BoundKey::ALL.len());
    }
}
