//! # Bayer 8x8 Ordered Dithering
//!
//! Converts continuous-tone images to the black/white dots a thermal head
//! can print. For each pixel position (x, y):
//!
//! 1. Look up a threshold from the matrix using (x mod 8, y mod 8)
//! 2. Compare the pixel's intensity (0.0 = white, 1.0 = black) to it
//! 3. Print a dot if the intensity is above the threshold
//!
//! Ordered dithering is deterministic and has no error propagation, so rows
//! are dithered in parallel.
//!
//! ```
//! use starprnt::render::dither;
//!
//! let row: Vec<bool> = vec![true, true, false, false, true, false, true, false];
//! assert_eq!(dither::pack_row(&row), vec![0b11001010]);
//! ```

use image::DynamicImage;
use image::imageops::FilterType;
use rayon::prelude::*;

/// Bayer 8x8 dithering matrix (values 0-63).
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Get the dithering threshold for a pixel position.
///
/// Returns `(matrix_value + 0.5) / 64`, never exactly 0 or 1, so full black
/// always prints and full white never does.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Determine if a dot should be printed at the given position.
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Pack a row of boolean pixel values into bytes.
///
/// Bit 7 (MSB) is the leftmost pixel, 1 = black. A partial last byte is
/// padded with white.
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }

    bytes
}

/// Generate a dithered raster from an intensity function `f(x, y)`.
///
/// Length of the result is `ceil(width/8) * height` bytes.
///
/// ```
/// use starprnt::render::dither::generate_raster;
///
/// let data = generate_raster(64, 100, |x, _y| x as f32 / 64.0);
/// assert_eq!(data.len(), 8 * 100);
/// ```
pub fn generate_raster<F>(width: usize, height: usize, intensity_fn: F) -> Vec<u8>
where
    F: Fn(usize, usize) -> f32 + Sync,
{
    (0..height)
        .into_par_iter()
        .map(|y| {
            let row: Vec<bool> = (0..width)
                .map(|x| should_print(x, y, intensity_fn(x, y)))
                .collect();
            pack_row(&row)
        })
        .collect::<Vec<_>>()
        .concat()
}

/// A packed 1-bit raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

/// Resize an image to `target_width` (keeping aspect ratio, optionally
/// capped at `max_height`) and dither it.
pub fn dither_image(
    source: &DynamicImage,
    target_width: usize,
    max_height: Option<usize>,
) -> Raster {
    let aspect = source.height() as f32 / source.width().max(1) as f32;
    let scaled_height = ((target_width as f32 * aspect).round() as u32).max(1);
    let mut resized = source.resize_exact(target_width as u32, scaled_height, FilterType::Lanczos3);

    if let Some(max_h) = max_height
        && scaled_height > max_h as u32
    {
        resized = resized.resize(target_width as u32, max_h.max(1) as u32, FilterType::Lanczos3);
    }

    let width = resized.width() as usize;
    let height = resized.height() as usize;
    let grayscale = resized.to_luma8();

    let data = generate_raster(width, height, |x, y| {
        let pixel = grayscale.get_pixel(x as u32, y as u32);
        1.0 - (pixel[0] as f32 / 255.0)
    });

    Raster {
        width,
        height,
        data,
    }
}

// ============================================================================
// TESTS
// ============================================================================
