//! Configuration file support for plan surface analysis.
//!
//! The configuration is an explicit, immutable description of a run:
//! category order, reference and marker colors, and tolerance. It is
//! serialized as JSON and validated into a [`ValidatedConfig`] before any
//! pixel is scanned.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color_utils::{Rgb, hex_to_rgb, rgb_from_ints, rgb_to_hex};
use crate::constants::{DEFAULT_TOLERANCE, MAX_UI_TOLERANCE};
use crate::error::Result;
use crate::model::{Category, CategorySet, Tolerance};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
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

/// A color as written in a configuration file: `"#RRGGBB"` or `[r, g, b]`.
///
/// Array channels are read as wide integers so out-of-range values reach
/// validation instead of failing deserialization with an opaque message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// `#RRGGBB` hex string
    Hex(String),
    /// Raw channel values
    Channels([i64; 3]),
}

impl ColorValue {
    /// Validate and convert to an RGB triple.
    pub fn to_rgb(&self, what: &str) -> Result<Rgb> {
        match self {
            ColorValue::Hex(hex) => hex_to_rgb(hex),
            ColorValue::Channels(channels) => rgb_from_ints(*channels, what),
        }
    }
}

impl From<Rgb> for ColorValue {
    fn from(rgb: Rgb) -> Self {
        ColorValue::Hex(rgb_to_hex(rgb))
    }
}

/// Category configuration for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Unique identifier of the category
    pub name: String,
    /// Display label; defaults to the name
    #[serde(default)]
    pub label: Option<String>,
    /// Color detected on the plan
    pub reference: ColorValue,
    /// Color painted on matched pixels (absent for the background)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<ColorValue>,
    /// Whether this is the background category
    #[serde(default)]
    pub background: bool,
}

impl CategoryConfig {
    fn to_category(&self) -> Result<Category> {
        let reference = self
            .reference
            .to_rgb(&format!("reference color of '{}'", self.name))?;
        let marker = self
            .marker
            .as_ref()
            .map(|m| m.to_rgb(&format!("marker color of '{}'", self.name)))
            .transpose()?;

        Ok(Category {
            name: self.name.clone(),
            label: self.label.clone().unwrap_or_else(|| self.name.clone()),
            reference,
            marker,
            is_background: self.background,
        })
    }
}

impl From<&Category> for CategoryConfig {
    fn from(cat: &Category) -> Self {
        Self {
            name: cat.name.clone(),
            label: Some(cat.label.clone()),
            reference: cat.reference.into(),
            marker: cat.marker.map(ColorValue::from),
            background: cat.is_background,
        }
    }
}

/// The four site-plan categories in their detection order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::background("background", "Background", [0x00, 0x4D, 0xA9]),
        Category::new(
            "urbanized",
            "Urbanized",
            [0xFF, 0xFF, 0xFF],
            [255, 0, 0],
        ),
        Category::new(
            "natural_artificial",
            "Natural artificial",
            [0x90, 0xEE, 0x90],
            [255, 165, 0],
        ),
        Category::new(
            "natural_existing",
            "Natural existing",
            [0x00, 0x64, 0x00],
            [235, 246, 0],
        ),
    ]
}

fn default_tolerance() -> i64 {
    DEFAULT_TOLERANCE
}

/// Analysis configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Maximum per-channel difference for a match
    #[serde(default = "default_tolerance")]
    pub tolerance: i64,

    /// Categories in detection order
    pub categories: Vec<CategoryConfig>,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// A configuration whose colors, categories and tolerance passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// Categories in detection order
    pub categories: CategorySet,
    /// Shared matching tolerance
    pub tolerance: Tolerance,
}

impl ValidatedConfig {
    /// Pair an already validated category set with a tolerance.
    pub fn new(categories: CategorySet, tolerance: Tolerance) -> Self {
        Self {
            categories,
            tolerance,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            tolerance: DEFAULT_TOLERANCE,
            categories: default_categories()
                .iter()
                .map(CategoryConfig::from)
                .collect(),
            log_level: LogLevel::default(),
        }
    }

    /// Return a copy with a different tolerance.
    pub fn with_tolerance(mut self, tolerance: i64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Check every constraint and build the immutable run configuration.
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let tolerance = Tolerance::new(self.tolerance)?;
        if self.tolerance > MAX_UI_TOLERANCE {
            log::warn!(
                "Tolerance {} exceeds the usual maximum of {}, most colors will match",
                self.tolerance,
                MAX_UI_TOLERANCE
            );
        }

        let categories = self
            .categories
            .iter()
            .map(CategoryConfig::to_category)
            .collect::<Result<Vec<_>>>()?;

        Ok(ValidatedConfig::new(CategorySet::new(categories)?, tolerance))
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Read a configuration file.
    pub fn load_from_path(path: &Path) -> std::result::Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write the configuration, creating parent directories if needed.
    pub fn save_to_path(&self, path: &Path) -> std::result::Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for config export.
    pub fn default_filename() -> &'static str {
        "plan-surface.json"
    }

    /// Get the default config file path for auto-load/save.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("plan-surface").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("plan-surface")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for AnalysisConfig {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn test_default_config_validates() {
        let validated = AnalysisConfig::default().validate().unwrap();
        assert_eq!(validated.tolerance.value(), 10);
        assert_eq!(validated.categories.len(), 4);
        assert_eq!(validated.categories.background().reference, [0, 77, 169]);

        let names: Vec<&str> = validated.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["background", "urbanized", "natural_artificial", "natural_existing"]
        );
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AnalysisConfig::default().with_tolerance(25);
        let json = config.to_json().unwrap();
        let parsed = AnalysisConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_colors_as_hex_or_array() {
        let json = r##"{
            "version": 1,
            "tolerance": 0,
            "categories": [
                { "name": "bg", "reference": "#004DA9", "background": true },
                { "name": "built", "reference": [255, 255, 255], "marker": "#FF0000" }
            ]
        }"##;
        let validated = AnalysisConfig::from_json(json).unwrap().validate().unwrap();
        let built = validated.categories.get(1).unwrap();
        assert_eq!(built.reference, [255, 255, 255]);
        assert_eq!(built.marker, Some([255, 0, 0]));
        assert_eq!(built.label, "built");
    }

    #[test]
    fn test_out_of_range_channel_is_invalid_input() {
        let json = r#"{
            "version": 1,
            "categories": [
                { "name": "bg", "reference": [0, 77, 256], "background": true }
            ]
        }"#;
        let config = AnalysisConfig::from_json(json).unwrap();
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { .. }));
        assert!(err.to_string().contains("256"));
    }

    #[test]
    fn test_negative_tolerance_is_invalid_input() {
        let err = AnalysisConfig::default()
            .with_tolerance(-5)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { .. }));
    }

    #[test]
    fn test_tolerance_above_ui_maximum_accepted() {
        let validated = AnalysisConfig::default().with_tolerance(200).validate().unwrap();
        assert_eq!(validated.tolerance.value(), 200);
    }

    #[test]
    fn test_version_too_new() {
        let mut config = AnalysisConfig::default();
        config.version = CONFIG_VERSION + 1;
        let json = config.to_json().unwrap();
        assert!(matches!(
            AnalysisConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
    }

    #[test]
    fn test_log_level_serde() {
        let json = serde_json::to_string(&LogLevel::Debug).unwrap();
        assert_eq!(json, "\"debug\"");
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
        assert_eq!(LogLevel::default().name(), "Warn");
    }
}
