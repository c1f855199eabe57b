//! Symbol decoder seam
//!
//! The decode pipeline only knows the [`SymbolDecoder`] trait. The default
//! implementation wraps `rqrr`, which locates and decodes QR symbols in a
//! luminance plane.

pub mod config;
pub mod rqrr_decoder;

pub use config::{DecodeConfig, SymbolFamily};
pub use rqrr_decoder::RqrrDecoder;

use image::DynamicImage;

/// Locates a symbol in a raster and extracts its text.
///
/// "Nothing found" is a normal outcome and is reported as `None`.
pub trait SymbolDecoder: Send + Sync {
    /// Try to decode one symbol from `image`
    fn decode(&self, image: &DynamicImage, config: &DecodeConfig) -> Option<String>;
}

impl<D: SymbolDecoder + ?Sized> SymbolDecoder for &D {
    fn decode(&self, image: &DynamicImage, config: &DecodeConfig) -> Option<String> {
        (**self).decode(image, config)
    }
}

impl<D: SymbolDecoder + ?Sized> SymbolDecoder for Box<D> {
    fn decode(&self, image: &DynamicImage, config: &DecodeConfig) -> Option<String> {
        (**self).decode(image, config)
    }
}
