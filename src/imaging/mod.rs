//! Caption rendering in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Word wrap** | [`wrap_text`], greedy over a width callback |
//! | **Measure / draw glyphs** | `imageproc::drawing::{text_size, draw_text_mut}` over `ab_glyph` |
//! | **Decode background** | `image::ImageReader` |
//! | **Encode output** | `image::DynamicImage::save_with_format` |
//!
//! The module is split into:
//! - **Layout**: greedy line breaking (pure, unit testable)
//! - **Calculations**: centering and outline offset math (pure)
//! - **Parameters**: colors, ratios and spacing for one render
//! - **Font**: [`GlyphSource`] trait + [`TrueTypeFont`]
//! - **Render**: high-level functions combining the above

pub mod calculations;
pub mod font;
pub mod layout;
mod params;
pub mod render;

pub use font::{GlyphSource, RenderError, TrueTypeFont};
pub use layout::wrap_text;
pub use params::{RenderParams, parse_hex_color};
pub use render::{
    PlacedLine, load_background, place_lines, render_caption, render_caption_file, save_rendered,
};
