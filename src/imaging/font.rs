//! Glyph source trait and the TrueType implementation.
//!
//! The [`GlyphSource`] trait is the two operations the renderer needs from a
//! font: measure a string and draw a string. Layout and pack logic only ever
//! see the trait, which keeps them testable with the block-glyph mock in
//! [`tests`].
//!
//! The production implementation is [`TrueTypeFont`]: an `ab_glyph` font at a
//! fixed pixel size, measured and drawn through `imageproc`.

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures loading or writing the resources a render touches.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to load font {path}: {reason}")]
    FontLoad { path: PathBuf, reason: String },
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to write {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A font at a fixed size, able to measure and draw single lines.
pub trait GlyphSource {
    /// Rendered `(width, height)` of `text` in pixels.
    fn text_size(&self, text: &str) -> (u32, u32);

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels falling
    /// outside the canvas are dropped.
    fn draw_text(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str);
}

/// A TrueType/OpenType font loaded from disk at one pixel size.
pub struct TrueTypeFont {
    font: FontVec,
    scale: PxScale,
}

impl TrueTypeFont {
    /// Read and parse a font file. Both a missing file and unparseable bytes
    /// are reported as [`RenderError::FontLoad`].
    pub fn load(path: &Path, size_px: f32) -> Result<Self, RenderError> {
        let bytes = std::fs::read(path).map_err(|e| RenderError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(bytes, size_px).map_err(|e| RenderError::FontLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn from_bytes(bytes: Vec<u8>, size_px: f32) -> Result<Self, ab_glyph::InvalidFont> {
        let font = FontVec::try_from_vec(bytes)?;
        Ok(Self {
            font,
            scale: PxScale::from(size_px),
        })
    }
}

impl GlyphSource for TrueTypeFont {
    fn text_size(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    fn draw_text(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}
