use image::GrayImage;
use rayon::prelude::*;

/// Clamp a configured output intensity into the legal channel range
pub fn clamp_intensity(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Fixed global threshold binarization.
///
/// Pixels strictly brighter than `threshold` become `foreground_value`
/// (clamped to 0..=255); every other pixel becomes 0. Returns a new plane.
pub fn threshold_binarize(gray: &GrayImage, threshold: u8, foreground_value: i32) -> GrayImage {
    let high = clamp_intensity(foreground_value);
    let (width, height) = gray.dimensions();
    let mut out = gray.as_raw().clone();

    out.par_iter_mut()
        .for_each(|px| *px = if *px > threshold { high } else { 0 });

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| GrayImage::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_binarize() {
        let gray = GrayImage::from_raw(2, 2, vec![100, 150, 200, 128]).unwrap(); // 2x2 image
        let binary = threshold_binarize(&gray, 128, 255);

        assert_eq!(binary.get_pixel(0, 0).0[0], 0); // 100 <= 128
        assert_eq!(binary.get_pixel(1, 0).0[0], 255); // 150 > 128
        assert_eq!(binary.get_pixel(0, 1).0[0], 255); // 200 > 128
        assert_eq!(binary.get_pixel(1, 1).0[0], 0); // 128 is not above the threshold
    }

    #[test]
    fn test_out_of_range_value_is_clamped() {
        let gray = GrayImage::from_raw(2, 1, vec![10, 240]).unwrap();
        let binary = threshold_binarize(&gray, 128, 256);
        assert_eq!(binary.as_raw(), &vec![0, 255]);

        let binary = threshold_binarize(&gray, 128, -40);
        assert_eq!(binary.as_raw(), &vec![0, 0]);
    }

    #[test]
    fn test_input_untouched() {
        let gray = GrayImage::from_raw(3, 1, vec![0, 130, 255]).unwrap();
        let before = gray.clone();
        let _ = threshold_binarize(&gray, 128, 255);
        assert_eq!(gray, before);
    }

    #[test]
    fn test_clamp_intensity() {
        assert_eq!(clamp_intensity(300), 255);
        assert_eq!(clamp_intensity(-1), 0);
        assert_eq!(clamp_intensity(42), 42);
    }
}
