//! Configuration file support for medmark.
//!
//! This module provides serialization and deserialization of application settings:
//! drawing style, the color palette and user preferences.

use serde::{Deserialize, Serialize};

use crate::color_utils::Color;
use crate::constants;
use crate::model::LabelMode;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Drawing sizes
    #[serde(default)]
    pub style: StyleConfig,

    /// Colors offered to the user
    #[serde(default = "default_palette")]
    pub palette: Vec<PaletteEntry>,
}

/// User preferences section of the config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Mode active when a project is opened
    #[serde(default)]
    pub default_mode: LabelMode,

    /// Color active when a project is opened
    #[serde(default)]
    pub default_color: Color,
}

/// Sizes used when drawing and hit-testing annotations, in working pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_point_width")]
    pub point_width: f64,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_angle_width")]
    pub angle_width: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default = "default_eps")]
    pub eps: f64,
}

fn default_point_width() -> f64 {
    constants::POINT_WIDTH
}

fn default_line_width() -> f64 {
    constants::LINE_WIDTH
}

fn default_angle_width() -> f64 {
    constants::ANGLE_WIDTH
}

fn default_font_size() -> f64 {
    constants::FONT_SIZE
}

fn default_eps() -> f64 {
    constants::EPS
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            point_width: default_point_width(),
            line_width: default_line_width(),
            angle_width: default_angle_width(),
            font_size: default_font_size(),
            eps: default_eps(),
        }
    }
}

/// A named color in the palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Color,
}

impl PaletteEntry {
    pub fn new(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }
}

fn default_palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry::new("red", Color::RED),
        PaletteEntry::new("orange", Color::ORANGE),
        PaletteEntry::new("yellow", Color::YELLOW),
        PaletteEntry::new("green", Color::GREEN),
        PaletteEntry::new("cyan", Color::CYAN),
        PaletteEntry::new("blue", Color::BLUE),
        PaletteEntry::new("purple", Color::PURPLE),
        PaletteEntry::new("white", Color::WHITE),
    ]
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            style: StyleConfig::default(),
            palette: default_palette(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    ///
    /// The default color is added to the palette if it is missing.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        config.ensure_default_color_in_palette();
        Ok(config)
    }

    fn ensure_default_color_in_palette(&mut self) {
        let color = self.preferences.default_color;
        if !self.palette.iter().any(|entry| entry.color == color) {
            log::debug!("Adding default color {} to palette", color);
            self.palette.push(PaletteEntry::new(&color.to_hex(), color));
        }
    }

    /// Look up a palette color by name (case-insensitive).
    pub fn palette_color(&self, name: &str) -> Option<Color> {
        self.palette
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.color)
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "medmark-config.json"
    }

    /// Get the default config file path for auto-load/save.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("medmark").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("medmark")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a file, creating parent directories as needed.
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
