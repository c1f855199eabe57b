//! Grayscale morphology used by the decode fallback

use image::GrayImage;
use rayon::prelude::*;

/// Dilate with a 3×3 square structuring element, one iteration.
///
/// Each output pixel is the maximum of its in-bounds 3×3 neighbourhood,
/// so bright (foreground) regions grow by one pixel in every direction.
pub fn dilate_3x3(src: &GrayImage) -> GrayImage {
    let (width, height) = src.dimensions();
    let (w, h) = (width as usize, height as usize);
    let data = src.as_raw();
    let mut out = vec![0u8; w * h];

    if w > 0 {
        out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
            let y0 = y.saturating_sub(1);
            let y1 = (y + 1).min(h - 1);
            for (x, px) in row.iter_mut().enumerate() {
                let x0 = x.saturating_sub(1);
                let x1 = (x + 1).min(w - 1);
                let mut max = 0u8;
                for ny in y0..=y1 {
                    let line = &data[ny * w..(ny + 1) * w];
                    for &v in &line[x0..=x1] {
                        max = max.max(v);
                    }
                }
                *px = max;
            }
        });
    }

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| GrayImage::new(width, height))
}
