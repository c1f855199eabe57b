use serde::Serialize;

/// Symbol families a decoder may search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolFamily {
    /// QR Code (2D matrix family)
    QrCode,
}

/// Decoder settings shared by every attempt of a read
///
/// Not configurable per request: every read searches rotated and inverted
/// symbols and only considers the 2D matrix family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodeConfig {
    /// Accept symbols at any rotation
    pub try_rotated: bool,
    /// Accept light-on-dark symbols
    pub try_inverted: bool,
    /// Restrict the search to this family
    pub family: SymbolFamily,
}

impl DecodeConfig {
    /// The fixed configuration used by the read pipeline
    pub const fn fixed() -> Self {
        Self {
            try_rotated: true,
            try_inverted: true,
            family: SymbolFamily::QrCode,
        }
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::fixed()
    }
}
