use super::color::Rgba;
use crate::error::{QrError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module shape used by the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Hard-edged square modules
    #[default]
    Standard,
    /// Anti-aliased circles inscribed in each module
    Bubble,
}

/// Error correction level requested from the matrix encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EccLevel {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    #[default]
    Q,
    /// ~30% recovery
    H,
}

impl FromStr for EccLevel {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(EccLevel::L),
            "M" => Ok(EccLevel::M),
            "Q" => Ok(EccLevel::Q),
            "H" => Ok(EccLevel::H),
            other => Err(QrError::Config(format!("unknown error-correction level '{other}'"))),
        }
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EccLevel::L => "L",
            EccLevel::M => "M",
            EccLevel::Q => "Q",
            EccLevel::H => "H",
        };
        f.write_str(s)
    }
}

/// Immutable per-request rendering configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pixel_size: u32,
    style: Style,
    foreground: Rgba,
    background: Rgba,
    transparent_background: bool,
    logo: Option<Vec<u8>>,
}

impl RenderConfig {
    /// Build a configuration; `pixel_size` must be at least 1
    pub fn new(
        pixel_size: u32,
        style: Style,
        foreground: Rgba,
        background: Rgba,
        transparent_background: bool,
        logo: Option<Vec<u8>>,
    ) -> Result<Self> {
        if pixel_size == 0 {
            return Err(QrError::InvalidInput("pixel size must be at least 1".into()));
        }
        Ok(Self {
            pixel_size,
            style,
            foreground,
            background,
            transparent_background,
            logo: logo.filter(|bytes| !bytes.is_empty()),
        })
    }

    /// Pixels per module edge
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    /// Module shape
    pub fn style(&self) -> Style {
        self.style
    }

    /// Color of dark modules
    pub fn foreground(&self) -> Rgba {
        self.foreground
    }

    /// Requested background color, ignored when the background is transparent
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Whether light areas are left fully transparent
    pub fn transparent_background(&self) -> bool {
        self.transparent_background
    }

    /// Background actually painted: transparency wins over the color
    pub fn effective_background(&self) -> Rgba {
        if self.transparent_background {
            Rgba::TRANSPARENT
        } else {
            self.background
        }
    }

    /// Encoded logo bytes, never empty when present
    pub fn logo(&self) -> Option<&[u8]> {
        self.logo.as_deref()
    }
}
