//! Configuration for the compositor and its software renderer

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Palette;

/// GUI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial screen width in pixels
    pub screen_width: u32,
    /// Initial screen height in pixels
    pub screen_height: u32,
    /// Color the window is cleared to before layers are drawn
    pub clear_color: (u8, u8, u8),
    /// Font used for consoles that do not name one
    pub default_font: String,
    /// Fonts to load at startup
    pub fonts: Vec<FontConfig>,
    /// Console color palette
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 1024,
            screen_height: 768,
            clear_color: (0, 0, 0),
            default_font: "mono".to_string(),
            fonts: vec![FontConfig {
                name: "mono".to_string(),
                path: PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf"),
                size: 16.0,
            }],
            palette: Palette::default(),
        }
    }
}

/// A named font face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Name consoles refer to the font by
    pub name: String,
    /// Path to a TrueType/OpenType file
    pub path: PathBuf,
    /// Font size in pixels
    pub size: f32,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/gridgui/config.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Check the configuration for values the compositor cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }

        let mut seen = HashSet::new();
        for font in &self.fonts {
            if !font.size.is_finite() || font.size <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "font '{}' has invalid size {}",
                    font.name, font.size
                )));
            }
            if !seen.insert(font.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "font '{}' is defined more than once",
                    font.name
                )));
            }
        }

        if !self.fonts.is_empty() && !seen.contains(self.default_font.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "default font '{}' is not in the font list",
                self.default_font
            )));
        }

        Ok(())
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config").join("gridgui"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.screen_width, 1024);
        assert_eq!(config.default_font, "mono");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"screen_width": 640}"#).unwrap();
        assert_eq!(config.screen_width, 640);
        assert_eq!(config.screen_height, 768);
    }

    #[test]
    fn test_validate_rejects_zero_screen() {
        let config = Config {
            screen_height: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_fonts() {
        let mut config = Config::default();
        let font = config.fonts[0].clone();
        config.fonts.push(font);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_font_size() {
        let mut config = Config::default();
        config.fonts[0].size = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default_font_must_exist() {
        let mut config = Config::default();
        config.default_font = "other".to_string();
        assert!(config.validate().is_err());

        // No fonts at all is allowed (owner-draw only)
        config.fonts.clear();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.screen_width = 320;
        config.clear_color = (1, 2, 3);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Json(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io(_))));
    }
}
