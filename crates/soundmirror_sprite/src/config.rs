// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scheduler configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Target update rate used when none (or an invalid one) is configured
pub const DEFAULT_FPS: f64 = 30.0;

/// Sprite asset root used when none is configured
pub const DEFAULT_BASE_PATH: &str = "/assets";

/// Errors raised when loading or saving a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this format
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Encoding failed
    #[error("Failed to encode config: {0}")]
    Encode(#[from] ron::Error),

    /// The file was written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Newest supported version
        supported: u32,
    },
}

/// Configuration of a [`SpriteScheduler`](crate::SpriteScheduler)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Format version
    pub version: u32,
    /// Root directory of the sprite assets
    pub base_path: String,
    /// Target number of state updates per second
    pub fps: f64,
    /// Language used for sprite paths when no timeline is loaded
    pub default_language: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            base_path: DEFAULT_BASE_PATH.to_string(),
            fps: DEFAULT_FPS,
            default_language: soundmirror_phoneme::FALLBACK_LANGUAGE.to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Default configuration rooted at `base_path`
    pub fn with_base_path(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    /// Set the target update rate
    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Effective update rate; non-positive or non-finite values use [`DEFAULT_FPS`]
    pub fn effective_fps(&self) -> f64 {
        if self.fps.is_finite() && self.fps > 0.0 {
            self.fps
        } else {
            DEFAULT_FPS
        }
    }

    /// Minimum time between two emitted updates, in milliseconds
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.effective_fps()
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();
        assert_eq!(config.base_path, "/assets");
        assert_eq!(config.fps, 30.0);
        assert_eq!(config.default_language, "en");
        assert!((config.frame_interval_ms() - 33.333).abs() < 0.001);
    }

    #[test]
    fn test_invalid_fps_uses_default() {
        for fps in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert_eq!(SchedulerConfig::default().with_fps(fps).effective_fps(), DEFAULT_FPS);
        }
        assert_eq!(SchedulerConfig::default().with_fps(60.0).effective_fps(), 60.0);
    }

    #[test]
    fn test_serialization() {
        let config = SchedulerConfig::with_base_path("/srv/sprites").with_fps(24.0);
        let ron = config.to_ron().unwrap();
        let loaded = SchedulerConfig::from_ron(&ron).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let loaded = SchedulerConfig::from_ron("(base_path: \"/cdn\")").unwrap();
        assert_eq!(loaded.base_path, "/cdn");
        assert_eq!(loaded.fps, DEFAULT_FPS);
        assert_eq!(loaded.version, CONFIG_FORMAT_VERSION);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let result = SchedulerConfig::from_ron("(version: 99)");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 99, .. })
        ));
        assert!(matches!(
            SchedulerConfig::from_ron("(fps: \"fast\")"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path =
            std::env::temp_dir().join(format!("soundmirror-config-{}.ron", std::process::id()));
        let config = SchedulerConfig::with_base_path("/tmp/sprites");
        config.save(&path).unwrap();
        let loaded = SchedulerConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
