//! Render settings loading and saving
//!
//! Uses RON (Rusty Object Notation) for a human-readable settings file.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::rasterizer::{HEIGHT, WIDTH};
use crate::world::LandscapeScale;

/// Largest supported display scale
pub const MAX_DISPLAY_SCALE: usize = 4;

/// Settings the renderer reads; owned by whoever persists them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Logical resolution
    pub logical_width: usize,
    pub logical_height: usize,
    /// Physical pixels per logical pixel (1..=4)
    pub display_scale: usize,
    /// Smooth the landscape edges instead of popping whole tiles
    pub smooth_clipping: bool,
    pub landscape_scale: LandscapeScale,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            logical_width: WIDTH,
            logical_height: HEIGHT,
            display_scale: 2,
            smooth_clipping: true,
            landscape_scale: LandscapeScale::X1,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display_scale == 0 || self.display_scale > MAX_DISPLAY_SCALE {
            return Err(ConfigError::InvalidDisplayScale(self.display_scale));
        }
        if self.logical_width == 0 || self.logical_height == 0 {
            return Err(ConfigError::InvalidResolution(self.logical_width, self.logical_height));
        }
        Ok(())
    }

    pub fn physical_width(&self) -> usize {
        self.logical_width * self.display_scale
    }

    pub fn physical_height(&self) -> usize {
        self.logical_height * self.display_scale
    }
}

/// Error type for settings loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    InvalidDisplayScale(usize),
    InvalidResolution(usize, usize),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ConfigError::InvalidDisplayScale(s) => {
                write!(f, "Display scale {} outside 1..={}", s, MAX_DISPLAY_SCALE)
            }
            ConfigError::InvalidResolution(w, h) => write!(f, "Invalid resolution {}x{}", w, h),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RenderSettings, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let settings = settings_from_str(&contents)?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

/// Save settings to a RON file
pub fn save_settings<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<(), ConfigError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(settings, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Parse settings from a RON string (missing fields take defaults)
pub fn settings_from_str(s: &str) -> Result<RenderSettings, ConfigError> {
    let settings: RenderSettings = ron::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}
