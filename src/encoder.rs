//! Matrix encoder seam: payload text to a module matrix

use crate::error::{QrError, Result};
use crate::models::{EccLevel, ModuleMatrix};
use qrcode::types::QrError as EncodeError;
use qrcode::{Color, EcLevel, QrCode};

/// Quiet zone width recommended for QR codes, in modules
pub const DEFAULT_QUIET_ZONE: usize = 4;

/// Turns a payload into a square module matrix with error correction
pub trait MatrixEncoder: Send + Sync {
    /// Encode `text` at the given error-correction level
    fn encode(&self, text: &str, ecc: EccLevel) -> Result<ModuleMatrix>;
}

/// [`MatrixEncoder`] backed by the `qrcode` crate, adding a light quiet zone
#[derive(Debug, Clone, Copy)]
pub struct QrcodeEncoder {
    quiet_zone: usize,
}

impl QrcodeEncoder {
    /// Encoder with the standard four-module quiet zone
    pub fn new() -> Self {
        Self::with_quiet_zone(DEFAULT_QUIET_ZONE)
    }

    /// Encoder with a custom quiet zone width
    pub fn with_quiet_zone(quiet_zone: usize) -> Self {
        Self { quiet_zone }
    }
}

impl Default for QrcodeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn ec_level(ecc: EccLevel) -> EcLevel {
    match ecc {
        EccLevel::L => EcLevel::L,
        EccLevel::M => EcLevel::M,
        EccLevel::Q => EcLevel::Q,
        EccLevel::H => EcLevel::H,
    }
}

impl MatrixEncoder for QrcodeEncoder {
    fn encode(&self, text: &str, ecc: EccLevel) -> Result<ModuleMatrix> {
        let code = QrCode::with_error_correction_level(text, ec_level(ecc)).map_err(|e| match e {
            EncodeError::DataTooLong => QrError::PayloadTooLarge(ecc.to_string()),
            other => QrError::InvalidPayload(other.to_string()),
        })?;

        let width = code.width();
        let qz = self.quiet_zone;
        let mut matrix = ModuleMatrix::new(width + 2 * qz);
        for (i, color) in code.to_colors().into_iter().enumerate() {
            if color == Color::Dark {
                matrix.set(qz + i % width, qz + i / width, true);
            }
        }

        tracing::debug!(
            symbol_width = width,
            matrix_size = matrix.size(),
            %ecc,
            "encoded payload"
        );
        Ok(matrix)
    }
}
