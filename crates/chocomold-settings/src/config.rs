//! Configuration and settings management for ChocoMold
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats; the default location is a platform-specific config
//! directory.
//!
//! Configuration is organized into logical sections:
//! - Mold parameters (block dimensions, depth, scale, invert)
//! - Pattern pipeline settings (flattening, simplification, complexity limits)
//! - Recent files

use crate::error::{ConfigError, SettingsError, SettingsResult};
use chocomold_core::constants::{
    DEFAULT_BASE_HEIGHT, DEFAULT_BASE_SIZE, DEFAULT_ENGRAVE_DEPTH, DEFAULT_FLATTEN_TOLERANCE,
    DEFAULT_PATTERN_MARGIN, DEFAULT_USER_SCALE, DEPTH_HEADROOM, DEPTH_RANGE, HARD_SHAPE_LIMIT,
    MIN_DEPTH, SCALE_RANGE, SIMPLIFY_MIN_DISTANCE_SQ, SOFT_SHAPE_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of entries kept in the recent files list
pub const MAX_RECENT_FILES: usize = 10;

/// Shape of the base solid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BaseStyle {
    /// Rectangular block
    Block,
    /// Four-sided frustum whose top face is inset by `top_inset` on every side
    Frustum { top_inset: f64 },
}

impl Default for BaseStyle {
    fn default() -> Self {
        Self::Block
    }
}

impl std::fmt::Display for BaseStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Frustum { top_inset } => write!(f, "frustum (inset {})", top_inset),
        }
    }
}

/// Parameters for one mold build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoldParameters {
    pub base_width: f64,
    pub base_length: f64,
    pub base_height: f64,
    /// Clearance kept between the pattern and the block edge
    pub pattern_margin: f64,
    pub engrave_depth: f64,
    /// Multiplier on the fitted pattern size
    pub user_scale: f64,
    /// Raise the pattern instead of recessing it
    pub invert: bool,
    pub base_style: BaseStyle,
}

impl Default for MoldParameters {
    fn default() -> Self {
        Self {
            base_width: DEFAULT_BASE_SIZE,
            base_length: DEFAULT_BASE_SIZE,
            base_height: DEFAULT_BASE_HEIGHT,
            pattern_margin: DEFAULT_PATTERN_MARGIN,
            engrave_depth: DEFAULT_ENGRAVE_DEPTH,
            user_scale: DEFAULT_USER_SCALE,
            invert: false,
            base_style: BaseStyle::Block,
        }
    }
}

impl MoldParameters {
    /// Largest pattern extent that fits inside the margin on the top face
    pub fn target_footprint(&self) -> f64 {
        let inset = match self.base_style {
            BaseStyle::Block => 0.0,
            BaseStyle::Frustum { top_inset } => top_inset,
        };
        self.base_width.min(self.base_length) - 2.0 * (self.pattern_margin + inset)
    }

    /// Engrave depth clamped so material always remains under the cut
    pub fn clamped_depth(&self) -> f64 {
        self.engrave_depth
            .min(self.base_height - DEPTH_HEADROOM)
            .max(MIN_DEPTH)
    }

    pub fn validate(&self) -> SettingsResult<()> {
        for (key, value) in [
            ("mold.base_width", self.base_width),
            ("mold.base_length", self.base_length),
            ("mold.base_height", self.base_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidDimension {
                    key: key.to_string(),
                    value,
                }
                .into());
            }
        }

        if !self.pattern_margin.is_finite() || self.pattern_margin < 0.0 {
            return Err(ConfigError::InvalidDimension {
                key: "mold.pattern_margin".to_string(),
                value: self.pattern_margin,
            }
            .into());
        }

        if let BaseStyle::Frustum { top_inset } = self.base_style {
            let limit = self.base_width.min(self.base_length) / 2.0;
            if !top_inset.is_finite() || top_inset < 0.0 || top_inset >= limit {
                return Err(SettingsError::InvalidSetting {
                    key: "mold.base_style.top_inset".to_string(),
                    reason: format!("must be in [0, {})", limit),
                });
            }
        }

        if self.target_footprint() <= 0.0 {
            let key = match self.base_style {
                BaseStyle::Block => "mold.pattern_margin",
                BaseStyle::Frustum { .. } => "mold.base_style.top_inset",
            };
            return Err(SettingsError::InvalidSetting {
                key: key.to_string(),
                reason: "margin and inset leave no room for the pattern".to_string(),
            });
        }

        check_range("mold.engrave_depth", self.engrave_depth, DEPTH_RANGE)?;
        check_range("mold.user_scale", self.user_scale, SCALE_RANGE)?;

        Ok(())
    }
}

fn check_range(key: &str, value: f64, (min, max): (f64, f64)) -> SettingsResult<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value,
            min,
            max,
        }
        .into());
    }
    Ok(())
}

/// Pattern pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSettings {
    /// Maximum deviation when flattening curves, in document units
    pub flatten_tolerance: f64,
    /// Squared spacing a vertex must exceed to survive simplification
    pub simplify_distance_sq: f64,
    /// Shape count above which the caller should confirm
    pub soft_shape_limit: usize,
    /// Shape count above which the builder returns the bare base
    pub hard_shape_limit: usize,
}

impl Default for PatternSettings {
    fn default() -> Self {
        Self {
            flatten_tolerance: DEFAULT_FLATTEN_TOLERANCE,
            simplify_distance_sq: SIMPLIFY_MIN_DISTANCE_SQ,
            soft_shape_limit: SOFT_SHAPE_LIMIT,
            hard_shape_limit: HARD_SHAPE_LIMIT,
        }
    }
}

impl PatternSettings {
    pub fn validate(&self) -> SettingsResult<()> {
        if !self.flatten_tolerance.is_finite() || self.flatten_tolerance <= 0.0 {
            return Err(ConfigError::InvalidDimension {
                key: "pattern.flatten_tolerance".to_string(),
                value: self.flatten_tolerance,
            }
            .into());
        }
        if !self.simplify_distance_sq.is_finite() || self.simplify_distance_sq < 0.0 {
            return Err(ConfigError::InvalidDimension {
                key: "pattern.simplify_distance_sq".to_string(),
                value: self.simplify_distance_sq,
            }
            .into());
        }
        if self.soft_shape_limit > self.hard_shape_limit {
            return Err(SettingsError::InvalidSetting {
                key: "pattern.soft_shape_limit".to_string(),
                reason: "must not exceed the hard shape limit".to_string(),
            });
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mold: MoldParameters,
    pub pattern: PatternSettings,
    /// Most recently used pattern files, newest first
    pub recent_files: Vec<PathBuf>,
}

impl Config {
    /// Create new default config
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config_dir>/chocomold/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(dir.join("chocomold").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Config = match extension(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML); parent directories are created
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.mold.validate()?;
        self.pattern.validate()?;
        Ok(())
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}

enum Format {
    Json,
    Toml,
}

fn extension(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("<none>").to_string()).into()),
    }
}
