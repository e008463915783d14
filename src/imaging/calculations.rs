//! Pure placement math for caption blocks.
//!
//! All functions here are pure and testable without any I/O or images.
//! Divisions truncate toward zero; results may be negative when the caption
//! is larger than the frame, and callers draw them unclamped.

/// Pixel budget for one caption line.
///
/// # Examples
/// ```
/// # use caption_pack::imaging::calculations::max_text_width;
/// assert_eq!(max_text_width(1080, 0.9), 972);
/// assert_eq!(max_text_width(1000, 1.0), 1000);
/// ```
pub fn max_text_width(image_width: u32, ratio: f64) -> u32 {
    (image_width as f64 * ratio) as u32
}

/// Vertical advance of a line: its glyph height scaled by the spacing factor.
pub fn spaced_line_height(line_height: u32, spacing: f64) -> i64 {
    (line_height as f64 * spacing) as i64
}

/// Top edge of a block of `block_height` pixels centered in the frame.
///
/// Negative when the block is taller than the frame.
pub fn block_start_y(image_height: u32, block_height: i64) -> i64 {
    (image_height as i64 - block_height) / 2
}

/// Left edge of a line of `line_width` pixels centered in the frame.
pub fn centered_x(image_width: u32, line_width: u32) -> i64 {
    (image_width as i64 - line_width as i64) / 2
}

/// Every integer offset within `radius` on both axes, except the origin.
///
/// Offsets are ordered row by row, left to right, which is the order the
/// outline is stamped in.
pub fn outline_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = radius as i32;
    let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
    for dx in -r..=r {
        for dy in -r..=r {
            if dx != 0 || dy != 0 {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // max_text_width tests
    // =========================================================================

    #[test]
    fn width_budget_truncates() {
        // 333 * 0.9 = 299.7
        assert_eq!(max_text_width(333, 0.9), 299);
    }

    #[test]
    fn width_budget_has_no_float_drift() {
        assert_eq!(max_text_width(100, 0.9), 90);
        assert_eq!(max_text_width(1080, 0.9), 972);
    }

    #[test]
    fn width_budget_full_ratio() {
        assert_eq!(max_text_width(640, 1.0), 640);
    }

    // =========================================================================
    // spaced_line_height tests
    // =========================================================================

    #[test]
    fn spacing_scales_and_truncates() {
        // 57 * 1.5 = 85.5
        assert_eq!(spaced_line_height(57, 1.5), 85);
    }

    #[test]
    fn unit_spacing_keeps_height() {
        assert_eq!(spaced_line_height(60, 1.0), 60);
    }

    #[test]
    fn empty_line_has_no_height() {
        assert_eq!(spaced_line_height(0, 1.5), 0);
    }

    // =========================================================================
    // centering tests
    // =========================================================================

    #[test]
    fn block_centered_vertically() {
        assert_eq!(block_start_y(1080, 180), 450);
    }

    #[test]
    fn odd_remainder_truncates() {
        assert_eq!(block_start_y(101, 50), 25);
    }

    #[test]
    fn tall_block_starts_above_frame() {
        assert_eq!(block_start_y(100, 300), -100);
    }

    #[test]
    fn negative_odd_remainder_truncates_toward_zero() {
        // (100 - 105) / 2 = -2.5
        assert_eq!(block_start_y(100, 105), -2);
        assert_eq!(centered_x(100, 105), -2);
    }

    #[test]
    fn line_centered_horizontally() {
        assert_eq!(centered_x(1080, 400), 340);
    }

    #[test]
    fn wide_line_starts_left_of_frame() {
        assert_eq!(centered_x(200, 500), -150);
    }

    // =========================================================================
    // outline_offsets tests
    // =========================================================================

    #[test]
    fn default_radius_stamps_120_times() {
        // 11 x 11 square minus the center
        assert_eq!(outline_offsets(5).len(), 120);
    }

    #[test]
    fn offsets_exclude_origin() {
        assert!(!outline_offsets(3).contains(&(0, 0)));
    }

    #[test]
    fn offsets_cover_corners() {
        let offsets = outline_offsets(2);
        for corner in [(-2, -2), (-2, 2), (2, -2), (2, 2)] {
            assert!(offsets.contains(&corner));
        }
    }

    #[test]
    fn zero_radius_has_no_outline() {
        assert!(outline_offsets(0).is_empty());
    }
}
