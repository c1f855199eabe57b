//! Luminance conversion for decoding
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
//!
//! Alpha is resolved against a white backdrop first, so transparent
//! regions read as light paper rather than as black ink.
use image::{DynamicImage, GrayImage, RgbaImage};
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luma_over_white(r: u8, g: u8, b: u8, a: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    let a = a as u32;
    // lum*a + 255*(1-a), in 0..=255 fixed point
    ((lum * a + 255 * (255 - a) + 127) / 255).min(255) as u8
}

/// Convert any decoded image into an 8-bit luminance plane
pub fn luminance(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageRgba8(rgba) => rgba_to_grayscale(rgba),
        other => rgba_to_grayscale(&other.to_rgba8()),
    }
}

/// Convert an RGBA raster to grayscale, processing rows in parallel
pub fn rgba_to_grayscale(rgba: &RgbaImage) -> GrayImage {
    let (width, height) = rgba.dimensions();
    let w = width as usize;
    let src = rgba.as_raw();
    let mut gray = vec![0u8; w * height as usize];

    if w > 0 {
        gray.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            let row_start = y * w * 4;
            for (x, out) in row.iter_mut().enumerate() {
                let idx = row_start + x * 4;
                *out = luma_over_white(src[idx], src[idx + 1], src[idx + 2], src[idx + 3]);
            }
        });
    }

    // Length always matches width * height
    GrayImage::from_raw(width, height, gray).unwrap_or_else(|| GrayImage::new(width, height))
}
