//! Logo overlay

use crate::error::{QrError, Result};
use crate::models::RasterImage;
use image::imageops::{self, FilterType};

/// Logo side is `image.width() / LOGO_RATIO`
pub const LOGO_RATIO: u32 = 5;

/// Where a logo lands on the base raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    /// Left edge of the overlay rectangle
    pub x: u32,
    /// Top edge of the overlay rectangle
    pub y: u32,
    /// Logo side length in pixels
    pub size: u32,
}

impl LogoPlacement {
    /// Centered square placement for a `width`×`height` canvas.
    ///
    /// Returns `None` when the logo would be smaller than one pixel.
    pub fn centered(width: u32, height: u32, ratio: u32) -> Option<Self> {
        let size = width.checked_div(ratio)?;
        if size == 0 {
            return None;
        }
        Some(Self {
            x: width.saturating_sub(size) / 2,
            y: height.saturating_sub(size) / 2,
            size,
        })
    }
}

/// Overlay `logo` centered on `image`, returning the composited raster.
///
/// Absent or empty logo bytes leave the image untouched. The logo is decoded
/// before any pixel is touched, so a failure never yields a partial image.
pub fn overlay_logo(image: RasterImage, logo: Option<&[u8]>) -> Result<RasterImage> {
    overlay_logo_with_ratio(image, logo, LOGO_RATIO)
}

/// [`overlay_logo`] with a configurable size ratio
pub fn overlay_logo_with_ratio(
    mut image: RasterImage,
    logo: Option<&[u8]>,
    ratio: u32,
) -> Result<RasterImage> {
    let Some(bytes) = logo.filter(|b| !b.is_empty()) else {
        return Ok(image);
    };

    let decoded =
        image::load_from_memory(bytes).map_err(|e| QrError::InvalidLogoData(e.to_string()))?;

    let Some(placement) = LogoPlacement::centered(image.width(), image.height(), ratio) else {
        tracing::warn!(
            width = image.width(),
            "canvas too small for a logo, skipping overlay"
        );
        return Ok(image);
    };

    let resized = decoded
        .resize_exact(placement.size, placement.size, FilterType::Triangle)
        .to_rgba8();

    tracing::debug!(
        x = placement.x,
        y = placement.y,
        size = placement.size,
        "compositing logo"
    );

    // Source-over blend: opaque logo pixels replace the code underneath
    imageops::overlay(&mut image, &resized, placement.x as i64, placement.y as i64);
    Ok(image)
}
