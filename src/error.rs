use thiserror::Error;

/// Errors produced while rendering or reading QR codes
#[derive(Error, Debug)]
pub enum QrError {
    /// Missing or blank payload text, missing image bytes, out-of-range sizes
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A color string that is not a well-formed hex triplet
    #[error("Invalid color '{0}': expected #RRGGBB or #RGB")]
    InvalidColor(String),

    /// Logo bytes that cannot be decoded as an image
    #[error("Invalid logo data: {0}")]
    InvalidLogoData(String),

    /// Input bytes that cannot be decoded as an image
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),

    /// Both decode attempts finished without finding a symbol
    #[error("QR code could not be read")]
    SymbolNotFound,

    /// Payload exceeds the capacity of the largest symbol at the requested level
    #[error("Payload too large for a QR code at error-correction level {0}")]
    PayloadTooLarge(String),

    /// Payload the matrix encoder refuses for any other reason
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Failure while encoding the final raster to PNG
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error (CLI and configuration loading)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QrError {
    /// Whether the error was caused by the request rather than by the service.
    ///
    /// `SymbolNotFound` counts as a client outcome: the image was well formed
    /// but did not contain a readable code.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QrError::InvalidInput(_)
                | QrError::InvalidColor(_)
                | QrError::InvalidLogoData(_)
                | QrError::InvalidImageData(_)
                | QrError::SymbolNotFound
                | QrError::PayloadTooLarge(_)
                | QrError::InvalidPayload(_)
        )
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, QrError>;
