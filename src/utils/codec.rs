//! Byte-level codecs: image containers and base64 transport

use crate::error::{QrError, Result};
use crate::models::RasterImage;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder};

/// Encode an RGBA raster as PNG bytes
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    let encoder = PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(png_bytes)
}

/// Decode any supported image container, failing with `InvalidImageData`
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(QrError::InvalidInput("image bytes are empty".into()));
    }
    image::load_from_memory(bytes).map_err(|e| QrError::InvalidImageData(e.to_string()))
}

/// Standard-alphabet base64
pub fn to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode base64, tolerating a `data:<mime>;base64,` prefix and surrounding whitespace
pub fn from_base64(value: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let trimmed = value.trim();
    let payload = match trimmed.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => trimmed,
    };
    STANDARD.decode(payload)
}
