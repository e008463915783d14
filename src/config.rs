//! Run configuration.
//!
//! Handles loading, validating, and layering `caption-pack.toml`. Values are
//! resolved in three layers, each overriding the one before:
//!
//! ```text
//! stock defaults  →  caption-pack.toml  →  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! repeat_count = 3              # Full passes over the caption sheet
//!
//! [input]
//! captions = "captions.ods"     # Spreadsheet (.ods, .xlsx, .xls)
//! sheet = "Sheet1"              # Sheet holding the captions
//! backgrounds = "backgrounds"   # Flat folder of background images
//! extensions = ["png"]          # Eligible background extensions
//! font = "font.ttf"             # TrueType/OpenType font file
//!
//! [output]
//! root = "output"               # Pack folders are created here
//! format = "png"                # Output file extension
//! manifest = true               # Write manifest.json into the output root
//!
//! [render]
//! font_size = 80.0              # Pixel size of the font
//! max_width_ratio = 0.9         # Share of image width a line may take
//! line_spacing = 1.5            # Line height multiplier
//! outline_thickness = 5         # Outline radius in pixels, 0 disables
//! outline_color = "#000000"
//! text_color = "#ffffff"
//!
//! [random]
//! seed = 42                     # Omit for a fresh random run each time
//!
//! [progress]
//! interval_ms = 1000            # Stopwatch tick interval
//! ```
//!
//! Config files are sparse; override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::imaging::{RenderParams, parse_hex_color};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file read when no `--config` is given. Its absence is not an error.
pub const DEFAULT_CONFIG_FILE: &str = "caption-pack.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    Missing(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything a run needs to know.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Number of full passes over the caption sheet.
    pub repeat_count: usize,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub render: RenderConfig,
    pub random: RandomConfig,
    pub progress: ProgressConfig,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            repeat_count: 3,
            input: InputConfig::default(),
            output: OutputConfig::default(),
            render: RenderConfig::default(),
            random: RandomConfig::default(),
            progress: ProgressConfig::default(),
        }
    }
}

impl PackConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeat_count == 0 {
            return Err(invalid("repeat_count must be at least 1"));
        }
        if self.input.extensions.is_empty() {
            return Err(invalid("input.extensions must not be empty"));
        }
        if self.input.extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
            return Err(invalid("input.extensions must not contain empty entries"));
        }
        if self.output_extension().is_empty() {
            return Err(invalid("output.format must not be empty"));
        }
        let writable = ImageFormat::from_extension(self.output_extension())
            .is_some_and(|format| format.writing_enabled());
        if !writable {
            return Err(ConfigError::Validation(format!(
                "output.format '{}' is not a supported output format (png, jpg, webp, tiff)",
                self.output.format
            )));
        }
        self.render.validate()?;
        if self.progress.interval_ms == 0 {
            return Err(invalid("progress.interval_ms must be greater than 0"));
        }
        Ok(())
    }

    /// Output extension without a leading dot.
    pub fn output_extension(&self) -> &str {
        self.output.format.trim_start_matches('.')
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.into())
}

/// Where the inputs live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Caption spreadsheet.
    pub captions: PathBuf,
    /// Sheet name inside the spreadsheet.
    pub sheet: String,
    /// Flat folder of background images.
    pub backgrounds: PathBuf,
    /// Background file extensions, matched case-insensitively.
    pub extensions: Vec<String>,
    pub font: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            captions: PathBuf::from("captions.ods"),
            sheet: "Sheet1".to_string(),
            backgrounds: PathBuf::from("backgrounds"),
            extensions: vec!["png".to_string()],
            font: PathBuf::from("font.ttf"),
        }
    }
}

/// Where and how results are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub root: PathBuf,
    /// File extension of rendered images; also picks the encoder.
    pub format: String,
    /// Write `manifest.json` describing every pack into `root`.
    pub manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("output"),
            format: "png".to_string(),
            manifest: true,
        }
    }
}

/// Caption look: font size, wrapping and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Font size in pixels.
    pub font_size: f32,
    pub max_width_ratio: f64,
    pub line_spacing: f64,
    pub outline_thickness: u32,
    pub outline_color: String,
    pub text_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 80.0,
            max_width_ratio: 0.9,
            line_spacing: 1.5,
            outline_thickness: 5,
            outline_color: "#000000".to_string(),
            text_color: "#ffffff".to_string(),
        }
    }
}

impl RenderConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(invalid("render.font_size must be greater than 0"));
        }
        if !(self.max_width_ratio > 0.0 && self.max_width_ratio <= 1.0) {
            return Err(invalid("render.max_width_ratio must be in (0, 1]"));
        }
        if !(self.line_spacing.is_finite() && self.line_spacing > 0.0) {
            return Err(invalid("render.line_spacing must be greater than 0"));
        }
        self.params().map(|_| ())
    }

    /// Convert to the renderer's parameter type, parsing the colors.
    pub fn params(&self) -> Result<RenderParams, ConfigError> {
        Ok(RenderParams {
            max_width_ratio: self.max_width_ratio,
            line_spacing: self.line_spacing,
            outline_thickness: self.outline_thickness,
            outline_color: color("render.outline_color", &self.outline_color)?,
            text_color: color("render.text_color", &self.text_color)?,
        })
    }
}

fn color(key: &str, value: &str) -> Result<image::Rgba<u8>, ConfigError> {
    parse_hex_color(value).ok_or_else(|| {
        ConfigError::Validation(format!(
            "{key} must be #rgb, #rrggbb or #rrggbbaa, got {value:?}"
        ))
    })
}

/// Randomness settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomConfig {
    /// Seed for background selection. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Stopwatch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressConfig {
    pub interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl ProgressConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PackConfig::default()).expect("default config must serialize")
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<PackConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: PackConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the run config.
///
/// With `path = None` the default `caption-pack.toml` is read if present;
/// an explicit path must exist. `cli` is the command-line layer, merged
/// last.
pub fn load_config(
    path: Option<&Path>,
    cli: Option<toml::Value>,
) -> Result<PackConfig, ConfigError> {
    let file = match path {
        Some(path) => {
            Some(load_raw_config(path)?.ok_or_else(|| ConfigError::Missing(path.to_path_buf()))?)
        }
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    resolve_config(stock_defaults_value(), file.into_iter().chain(cli))
}

/// Returns a fully-commented stock `caption-pack.toml` with all keys and
/// explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Caption Pack Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Command-line flags (--captions, --sheet, --backgrounds, --output, --font,
# --repeat, --seed) override the values in this file.
# Unknown keys will cause an error.

# How many times to regenerate every post. Each repeat draws fresh
# backgrounds and writes its own post_<row>_repeat_<n> folders.
repeat_count = 3

# ---------------------------------------------------------------------------
# Inputs
# ---------------------------------------------------------------------------
[input]
# Caption spreadsheet (.ods, .xlsx or .xls). Each row is a post, each cell
# one caption. Empty rows are skipped.
captions = "captions.ods"

# Sheet inside the spreadsheet that holds the captions.
sheet = "Sheet1"

# Flat folder of background images. Subfolders are not searched.
backgrounds = "backgrounds"

# Background file extensions (case-insensitive).
extensions = ["png"]

# TrueType/OpenType font used for every caption.
font = "font.ttf"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Pack folders are created here. Existing folders are reused, not cleared.
root = "output"

# Extension of rendered files; also selects the encoder (png, jpg, webp, tiff).
format = "png"

# Write manifest.json listing every pack, caption and background used.
manifest = true

# ---------------------------------------------------------------------------
# Caption rendering
# ---------------------------------------------------------------------------
[render]
# Font size in pixels.
font_size = 80.0

# Share of the image width a line of text may take, in (0, 1].
max_width_ratio = 0.9

# Line height multiplier. 1.0 stacks lines tightly.
line_spacing = 1.5

# Outline radius in pixels around every glyph. 0 disables the outline.
outline_thickness = 5

# Colors as #rgb, #rrggbb or #rrggbbaa.
outline_color = "#000000"
text_color = "#ffffff"

# ---------------------------------------------------------------------------
# Randomness
# ---------------------------------------------------------------------------
[random]
# Fix the seed to get the same background choices on every run.
# seed = 42

# ---------------------------------------------------------------------------
# Progress
# ---------------------------------------------------------------------------
[progress]
# How often the elapsed-time line is refreshed, in milliseconds.
interval_ms = 1000
"##
}
