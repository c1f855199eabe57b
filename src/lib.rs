//! QR Forge - styled QR rendering and robust QR reading
//!
//! Generation: payload → module matrix → styled raster (square or bubble
//! modules, recolored, optionally transparent) → centered logo → PNG → base64.
//!
//! Reading: image bytes → decode as-is → on failure, grayscale + fixed
//! threshold + 3×3 dilation → decode again → text or "not found".
//!
//! ```no_run
//! use qr_forge::{QrService, ReadRequest, RenderRequest, Settings};
//!
//! let service = QrService::new(Settings::default()).unwrap();
//! let request = RenderRequest::new("https://example.com");
//! let png = service.render_png(&request).unwrap();
//! let text = service.read(&ReadRequest { image: png }).unwrap().text;
//! assert_eq!(text, "https://example.com");
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Settings and preprocessing tunables
pub mod config;
/// Symbol decoder seam and the rqrr-backed implementation
pub mod decoder;
/// Matrix encoder seam and the qrcode-backed implementation
pub mod encoder;
/// Error taxonomy
pub mod error;
/// Core data structures (ModuleMatrix, Rgba, RenderConfig)
pub mod models;
/// Two-attempt read pipeline
pub mod pipeline;
/// Rasterizer and logo compositor
pub mod render;
/// Request-level service
pub mod service;
/// Usage statistics store
pub mod stats;
/// CLI helpers
pub mod tools;
/// Utility functions (grayscale, binarization, morphology, codecs)
pub mod utils;

pub use config::{PreprocessConfig, Settings};
pub use decoder::{DecodeConfig, RqrrDecoder, SymbolDecoder};
pub use encoder::{MatrixEncoder, QrcodeEncoder};
pub use error::{QrError, Result};
pub use models::{EccLevel, ModuleMatrix, RasterImage, RenderConfig, Rgba, Style};
pub use pipeline::{DecodeAttemptResult, DecodePipeline, DecodeReport};
pub use render::{overlay_logo, rasterize};
pub use service::{QrService, ReadRequest, ReadResponse, RenderRequest, RenderResponse};
pub use stats::{StatisticRecord, StatisticsStore, StatisticsSummary};

/// Render `matrix` and composite the configured logo
///
/// # Example
/// ```
/// use qr_forge::{ModuleMatrix, RenderConfig, Rgba, Style};
///
/// let mut matrix = ModuleMatrix::new(3);
/// matrix.set(1, 1, true);
/// let config = RenderConfig::new(4, Style::Standard, Rgba::BLACK, Rgba::WHITE, false, None).unwrap();
/// let image = qr_forge::render_matrix(&matrix, &config).unwrap();
/// assert_eq!(image.dimensions(), (12, 12));
/// ```
pub fn render_matrix(matrix: &ModuleMatrix, config: &RenderConfig) -> Result<RasterImage> {
    overlay_logo(rasterize(matrix, config)?, config.logo())
}
