//! Shared test utilities.
//!
//! Background fixtures are generated on the fly as small solid-color PNGs.
//! The font and spreadsheet fixtures are real files under `tests/fixtures/`.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let pool = write_backgrounds(&tmp.path().join("bg"), 3, 64, 48);
//! assert_eq!(pool.len(), 3);
//! ```

use crate::backgrounds::BackgroundPool;
use image::{Rgb, RgbImage};
use std::path::Path;

/// Owned caption strings from literals.
pub fn captions(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

/// Mid-tone fill for background `index`. Never pure black or white, so
/// rendered text pixels are always distinguishable from the background.
pub fn background_color(index: usize) -> Rgb<u8> {
    let shade = (index * 37 % 120) as u8;
    Rgb([60 + shade, 90, 180 - shade])
}

/// Write `count` solid-color PNGs named `bg_00.png`, `bg_01.png`, ... into
/// `dir` (created if needed) and return them as a pool.
pub fn write_backgrounds(dir: &Path, count: usize, width: u32, height: u32) -> BackgroundPool {
    std::fs::create_dir_all(dir).unwrap();
    let images = (0..count)
        .map(|i| {
            let path = dir.join(format!("bg_{i:02}.png"));
            RgbImage::from_pixel(width, height, background_color(i))
                .save(&path)
                .unwrap();
            path
        })
        .collect();
    BackgroundPool::new(dir, images)
}
