//! Tool configuration.
//!
//! Handles loading, validating and merging a `simple-resize.toml` file over
//! the stock defaults. The file only sets the starting values of a session;
//! edits made while resizing are never written back.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [output]
//! format = "jpeg"             # jpeg, png or webp
//! quality = 0.9               # 0.0-1.0, JPEG only
//! quality_scale = "stepped"   # stepped (0.05-1.0 by 0.05) or continuous
//! filter = "triangle"         # nearest, triangle, catmullrom, gaussian, lanczos3
//! max_edge = 16384            # largest output edge in pixels
//! directory = "."             # where downloads are saved
//!
//! [size]
//! keep_aspect = true
//! use_percent = false
//! percent = 100.0
//! authoritative = "width"     # edge that wins under keep_aspect
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [output]
//! format = "webp"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::engine::DEFAULT_MAX_EDGE;
use crate::imaging::{Edge, OutputFormat, Quality, QualityScale, ResampleFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "simple-resize.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `simple-resize.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    /// Encoding and saving.
    pub output: OutputConfig,
    /// Initial size fields.
    pub size: SizeConfig,
}

impl ResizeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be between 0.0 and 1.0".into(),
            ));
        }
        if self.output.max_edge == 0 {
            return Err(ConfigError::Validation(
                "output.max_edge must be non-zero".into(),
            ));
        }
        if !self.size.percent.is_finite() || self.size.percent <= 0.0 {
            return Err(ConfigError::Validation(
                "size.percent must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

/// Encoding and saving settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Encoder quality, 0.0 (worst) to 1.0 (best). Ignored by PNG and WebP.
    pub quality: f32,
    pub quality_scale: QualityScale,
    pub filter: ResampleFilter,
    /// Largest allowed output edge, in pixels.
    pub max_edge: u32,
    /// Directory downloads are saved into.
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            quality: Quality::DEFAULT,
            quality_scale: QualityScale::default(),
            filter: ResampleFilter::default(),
            max_edge: DEFAULT_MAX_EDGE,
            directory: PathBuf::from("."),
        }
    }
}

/// Initial values of the size fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeConfig {
    pub keep_aspect: bool,
    pub use_percent: bool,
    pub percent: f64,
    pub authoritative: Edge,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self {
            keep_aspect: true,
            use_percent: false,
            percent: 100.0,
            authoritative: Edge::Width,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ResizeConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ResizeConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ResizeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<ResizeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load config from `path` if given, else from [`DEFAULT_CONFIG_FILE`] in
/// `dir` when present, else the stock defaults.
pub fn load_config(path: Option<&Path>, dir: &Path) -> Result<ResizeConfig, ConfigError> {
    if let Some(path) = path {
        return load_config_file(path);
    }
    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        tracing::debug!(path = %default_path.display(), "loading config");
        load_config_file(&default_path)
    } else {
        resolve_config(None)
    }
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-resize configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# These are starting values only; nothing is ever written back here.

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Encoded format: "jpeg", "png" or "webp".
format = "jpeg"

# Encoder quality from 0.0 (smallest) to 1.0 (best).
# Only JPEG is lossy; PNG and WebP output is lossless and ignores this.
quality = 0.9

# How quality values are normalized:
#   "stepped"    -> 0.05 to 1.0 in steps of 0.05
#   "continuous" -> any value from 0.0 to 1.0
quality_scale = "stepped"

# Resampling filter: "nearest", "triangle" (bilinear), "catmullrom",
# "gaussian" or "lanczos3".
filter = "triangle"

# Largest output edge in pixels. Larger targets are rejected.
max_edge = 16384

# Directory resized files are saved into.
directory = "."

# ---------------------------------------------------------------------------
# Initial size fields
# ---------------------------------------------------------------------------
[size]
# Keep the source's width:height ratio when one edge is set.
keep_aspect = true

# Scale by percent instead of absolute pixels.
use_percent = false

# Scale factor in percent (100 = unchanged, above 100 upscales).
percent = 100.0

# Edge that wins under keep_aspect when both are given: "width" or "height".
authoritative = "width"
"##
}
