//! High-level caption rendering.
//!
//! These functions combine layout, placement math and a [`GlyphSource`]:
//! [`place_lines`] decides where every line goes, [`render_caption`] draws
//! them onto a copy of the background, and [`render_caption_file`] wraps the
//! whole thing with decode and encode.

use super::calculations::{
    block_start_y, centered_x, max_text_width, outline_offsets, spaced_line_height,
};
use super::font::{GlyphSource, RenderError};
use super::layout::wrap_text;
use super::params::RenderParams;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::path::Path;

/// One wrapped caption line and its top-left draw position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String,
    pub x: i64,
    pub y: i64,
    pub width: u32,
}

/// Wrap `text` for a `width` x `height` frame and position every line.
///
/// The lines form one block centered vertically; each line is centered
/// horizontally on its own measured width.
pub fn place_lines(
    glyphs: &impl GlyphSource,
    width: u32,
    height: u32,
    text: &str,
    params: &RenderParams,
) -> Vec<PlacedLine> {
    let budget = max_text_width(width, params.max_width_ratio);
    let lines = wrap_text(text, |candidate| glyphs.text_size(candidate).0, budget);

    let sized: Vec<(String, u32, i64)> = lines
        .into_iter()
        .map(|line| {
            let (w, h) = glyphs.text_size(&line);
            (line, w, spaced_line_height(h, params.line_spacing))
        })
        .collect();

    let block_height: i64 = sized.iter().map(|(_, _, advance)| advance).sum();
    let mut y = block_start_y(height, block_height);

    let mut placed = Vec::with_capacity(sized.len());
    for (text, line_width, advance) in sized {
        placed.push(PlacedLine {
            x: centered_x(width, line_width),
            y,
            width: line_width,
            text,
        });
        y += advance;
    }
    placed
}

/// Draw `text` onto a copy of `source`. The source is left untouched.
///
/// Each line is stamped in the outline color at every offset around its
/// position, then drawn once in the text color on top.
pub fn render_caption(
    source: &DynamicImage,
    text: &str,
    glyphs: &impl GlyphSource,
    params: &RenderParams,
) -> RgbaImage {
    let mut canvas = source.to_rgba8();
    let offsets = outline_offsets(params.outline_thickness);

    for line in place_lines(glyphs, canvas.width(), canvas.height(), text, params) {
        let (x, y) = (saturate(line.x), saturate(line.y));
        for &(dx, dy) in &offsets {
            glyphs.draw_text(
                &mut canvas,
                params.outline_color,
                x.saturating_add(dx),
                y.saturating_add(dy),
                &line.text,
            );
        }
        glyphs.draw_text(&mut canvas, params.text_color, x, y, &line.text);
    }

    canvas
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Load and decode a background image from disk.
pub fn load_background(path: &Path) -> Result<DynamicImage, RenderError> {
    let decode = |source: image::ImageError| RenderError::Decode {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(|e| decode(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode)
}

/// Encode a rendered canvas, inferring the format from the extension.
///
/// With `keep_alpha` false (or for JPEG, which has no alpha channel) the
/// canvas is flattened to RGB before encoding.
pub fn save_rendered(canvas: RgbaImage, keep_alpha: bool, path: &Path) -> Result<(), RenderError> {
    let encode = |source: image::ImageError| RenderError::Encode {
        path: path.to_path_buf(),
        source,
    };
    let format = ImageFormat::from_path(path).map_err(encode)?;
    let rgba = DynamicImage::ImageRgba8(canvas);
    let out = if keep_alpha && format != ImageFormat::Jpeg {
        rgba
    } else {
        DynamicImage::ImageRgb8(rgba.to_rgb8())
    };
    out.save_with_format(path, format).map_err(encode)
}

/// Decode `source`, draw `text` on it and write the result to `output`.
///
/// Returns the output dimensions, which always equal the source's.
pub fn render_caption_file(
    source: &Path,
    text: &str,
    output: &Path,
    glyphs: &impl GlyphSource,
    params: &RenderParams,
) -> Result<(u32, u32), RenderError> {
    let background = load_background(source)?;
    let keep_alpha = background.color().has_alpha();
    let canvas = render_caption(&background, text, glyphs, params);
    let dims = canvas.dimensions();
    save_rendered(canvas, keep_alpha, output)?;
    Ok(dims)
}
