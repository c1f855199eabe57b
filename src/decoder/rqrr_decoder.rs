use super::{DecodeConfig, SymbolDecoder, SymbolFamily};
use crate::utils::grayscale::luminance;
use image::{DynamicImage, GrayImage};
use rqrr::PreparedImage;

/// [`SymbolDecoder`] backed by `rqrr`.
///
/// rqrr searches every orientation on its own, so `try_rotated` needs no
/// extra work. Inverted symbols are found by scanning the negated plane
/// after the normal polarity comes up empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }
}

impl SymbolDecoder for RqrrDecoder {
    fn decode(&self, image: &DynamicImage, config: &DecodeConfig) -> Option<String> {
        match config.family {
            SymbolFamily::QrCode => {}
        }

        let gray = luminance(image);
        if let Some(text) = scan(&gray, false) {
            return Some(text);
        }
        if config.try_inverted {
            tracing::trace!("normal polarity empty, scanning inverted plane");
            return scan(&gray, true);
        }
        None
    }
}

/// Run rqrr over a luminance plane and return the first decodable grid
fn scan(gray: &GrayImage, inverted: bool) -> Option<String> {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    if w == 0 || h == 0 {
        return None;
    }
    let data = gray.as_raw();

    let mut prepared = PreparedImage::prepare_from_greyscale(w, h, |x, y| {
        let v = data[y * w + x];
        if inverted { 255 - v } else { v }
    });

    prepared
        .detect_grids()
        .into_iter()
        .find_map(|grid| match grid.decode() {
            Ok((_meta, content)) => Some(content),
            Err(err) => {
                tracing::trace!(?err, "grid located but not decodable");
                None
            }
        })
}
