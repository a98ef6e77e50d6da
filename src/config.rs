// src/config.rs

//! Configuration for sessions opened by the bundled showcase program.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is
//! a valid configuration. The library itself never reads this; `Session::open`
//! takes its parameters explicitly.

use crate::color::{Color, NamedColor};
use crate::error::ConfigError;
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory by [`Config::load_or_default`].
pub const CONFIG_FILE_NAME: &str = "x11lite.json";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub appearance: AppearanceConfig,
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 800,
            height: 600,
            title: "X11Lite Input Showcase".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    pub background: Color,
    pub foreground: Color,
    /// Size of the block drawn for each typed character.
    pub glyph_width: u32,
    pub glyph_height: u32,
    /// Horizontal advance per character and vertical advance per line.
    pub advance_x: i32,
    pub line_height: i32,
    /// Top-left corner of the first character.
    pub origin_x: i32,
    pub origin_y: i32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            background: Color::Named(NamedColor::BrightWhite),
            foreground: Color::Named(NamedColor::Black),
            glyph_width: 8,
            glyph_height: 16,
            advance_x: 10,
            line_height: 20,
            origin_x: 10,
            origin_y: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Sleep between frames of the showcase loop. Zero spins.
    pub frame_interval_ms: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        PerformanceConfig {
            frame_interval_ms: 16,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `x11lite.json` from the working directory, falling back to the
    /// defaults when it is absent or unreadable.
    pub fn load_or_default() -> Self {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        if !path.exists() {
            info!(
                "No {} found, using default configuration.",
                CONFIG_FILE_NAME
            );
            return Config::default();
        }
        match Config::load(&path) {
            Ok(config) => {
                info!("Configuration loaded from {}.", path.display());
                config
            }
            Err(e) => {
                warn!("{}. Using default configuration.", e);
                Config::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.appearance.background.to_pixel(), 0xFFFFFF);
        assert_eq!(config.appearance.foreground.to_pixel(), 0x000000);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let json = r#"{
            "window": { "title": "hello" },
            "performance": { "frame_interval_ms": 0 }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.window.title, "hello");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.performance.frame_interval_ms, 0);
        assert_eq!(config.appearance, AppearanceConfig::default());
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = Config::default();
        config.appearance.background = Color::Rgb(1, 2, 3);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/nonexistent/x11lite.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_reports_malformed_json() {
        let name = format!("x11lite-config-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, "{ not json").unwrap();
        let err = Config::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
