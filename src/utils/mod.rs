//! Utility functions for image processing
//!
//! This module provides helper functions for reading and writing QR rasters:
//! - Grayscale conversion (RGBA to luminance, alpha over white)
//! - Binarization (fixed threshold with clamped output)
//! - Morphology (3×3 dilation)
//! - Codecs (PNG container, base64 transport)

pub mod binarization;
pub mod codec;
pub mod grayscale;
pub mod morphology;
