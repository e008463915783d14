//! Parameter types for caption rendering.
//!
//! These describe *how a caption should look*, not how it is drawn. They sit
//! between [`config`](crate::config) (where the values come from) and
//! [`render`](super::render) (which does the pixel work).
//!
//! ## Types
//!
//! - [`RenderParams`]: width ratio, line spacing, outline radius and colors.
//! - [`parse_hex_color`]: `#rgb`, `#rrggbb` or `#rrggbbaa` into an `Rgba<u8>`.

use image::Rgba;

/// Everything about a caption's look except the font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Share of the image width a line may occupy, in (0, 1].
    pub max_width_ratio: f64,
    /// Multiplier on each line's height; above 1.0 adds a gap between lines.
    pub line_spacing: f64,
    /// Outline radius in pixels. 0 disables the outline.
    pub outline_thickness: u32,
    pub outline_color: Rgba<u8>,
    pub text_color: Rgba<u8>,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            max_width_ratio: 0.9,
            line_spacing: 1.5,
            outline_thickness: 5,
            outline_color: Rgba([0, 0, 0, 255]),
            text_color: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Parse a CSS-style hex color. Returns `None` for anything malformed.
pub fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 4];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                out[i] = v * 17;
            }
            out[3] = 255;
            Some(Rgba(out))
        }
        6 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Some(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_white_on_black_outline() {
        let p = RenderParams::default();
        assert_eq!(p.max_width_ratio, 0.9);
        assert_eq!(p.line_spacing, 1.5);
        assert_eq!(p.outline_thickness, 5);
        assert_eq!(p.outline_color, Rgba([0, 0, 0, 255]));
        assert_eq!(p.text_color, Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn parse_six_digit_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Rgba([255, 128, 0, 255])));
    }

    #[test]
    fn parse_short_color() {
        assert_eq!(parse_hex_color("#fff"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_hex_color("#0a0"), Some(Rgba([0, 170, 0, 255])));
    }

    #[test]
    fn parse_color_with_alpha() {
        assert_eq!(parse_hex_color("#00000080"), Some(Rgba([0, 0, 0, 128])));
    }

    #[test]
    fn parse_color_ignores_surrounding_whitespace() {
        assert_eq!(parse_hex_color("  #000000 "), Some(Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn reject_malformed_colors() {
        assert_eq!(parse_hex_color("000000"), None);
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("black"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }
}
