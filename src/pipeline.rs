//! Two-attempt read pipeline
//!
//! ```text
//! RawAttempt ──found──▶ Found(text)
//!     │ none
//!     ▼
//! PreprocessAttempt ──found──▶ Found(text)
//!     │ none
//!     ▼
//! NotFound
//! ```
//!
//! The preprocessing attempt runs on a derived luminance plane
//! (grayscale, fixed threshold, 3×3 dilation); the caller's raster is
//! only ever borrowed.

use crate::config::PreprocessConfig;
use crate::decoder::{DecodeConfig, SymbolDecoder};
use crate::error::{QrError, Result};
use crate::utils::binarization::threshold_binarize;
use crate::utils::codec::decode_image;
use crate::utils::grayscale::luminance;
use crate::utils::morphology::dilate_3x3;
use image::{DynamicImage, GenericImageView, GrayImage};

/// Outcome of a read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeAttemptResult {
    /// A symbol was decoded
    Text(String),
    /// Neither attempt found a symbol
    NotFound,
}

/// Which attempt of the state machine is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// Decoder on the input as-is
    RawAttempt,
    /// Decoder on the preprocessed copy
    PreprocessAttempt,
}

/// Result plus counters describing how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    /// Final outcome
    pub result: DecodeAttemptResult,
    /// Number of decoder invocations (1 or 2)
    pub attempts: usize,
    /// Whether the preprocessing fallback ran
    pub preprocessed: bool,
}

/// Read pipeline over an injected [`SymbolDecoder`]
#[derive(Debug, Clone)]
pub struct DecodePipeline<D> {
    decoder: D,
    config: DecodeConfig,
    preprocess: PreprocessConfig,
}

impl<D: SymbolDecoder> DecodePipeline<D> {
    /// Pipeline with the fixed decode configuration and default preprocessing
    pub fn new(decoder: D) -> Self {
        Self::with_preprocess(decoder, PreprocessConfig::default())
    }

    /// Pipeline with custom preprocessing tunables
    pub fn with_preprocess(decoder: D, preprocess: PreprocessConfig) -> Self {
        Self {
            decoder,
            config: DecodeConfig::fixed(),
            preprocess,
        }
    }

    /// The wrapped decoder
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Run the state machine on a decoded raster
    #[tracing::instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn run(&self, image: &DynamicImage) -> DecodeReport {
        let mut stage = DecodeStage::RawAttempt;
        let mut attempts = 0usize;

        loop {
            attempts += 1;
            let found = match stage {
                DecodeStage::RawAttempt => self.decoder.decode(image, &self.config),
                DecodeStage::PreprocessAttempt => {
                    let processed = DynamicImage::ImageLuma8(self.preprocess(image));
                    self.decoder.decode(&processed, &self.config)
                }
            };

            match (found, stage) {
                (Some(text), _) => {
                    tracing::debug!(?stage, attempts, "symbol decoded");
                    return DecodeReport {
                        result: DecodeAttemptResult::Text(text),
                        attempts,
                        preprocessed: stage == DecodeStage::PreprocessAttempt,
                    };
                }
                (None, DecodeStage::RawAttempt) => {
                    tracing::debug!("raw attempt found nothing, preprocessing");
                    stage = DecodeStage::PreprocessAttempt;
                }
                (None, DecodeStage::PreprocessAttempt) => {
                    tracing::debug!(attempts, "no symbol after preprocessing");
                    return DecodeReport {
                        result: DecodeAttemptResult::NotFound,
                        attempts,
                        preprocessed: true,
                    };
                }
            }
        }
    }

    /// Grayscale, fixed-threshold binarization, then one 3×3 dilation
    pub fn preprocess(&self, image: &DynamicImage) -> GrayImage {
        let gray = luminance(image);
        let binary = threshold_binarize(
            &gray,
            self.preprocess.threshold,
            self.preprocess.foreground_value,
        );
        dilate_3x3(&binary)
    }

    /// Decode raw image bytes into text.
    ///
    /// Empty bytes fail with `InvalidInput` before the decoder is touched;
    /// unparsable bytes fail with `InvalidImageData`; an exhausted pipeline
    /// fails with `SymbolNotFound`.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Err(QrError::InvalidInput("image bytes are required".into()));
        }
        let image = decode_image(bytes)?;
        match self.run(&image).result {
            DecodeAttemptResult::Text(text) => Ok(text),
            DecodeAttemptResult::NotFound => Err(QrError::SymbolNotFound),
        }
    }
}
