use crate::error::QrError;
use std::fmt;
use std::str::FromStr;

/// 8-bit RGBA color, straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel, 255 = opaque
    pub a: u8,
}

impl Rgba {
    /// Opaque black
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    /// Opaque white
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    /// Fully transparent black
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Fully opaque color from RGB channels
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or the `#RGB` shorthand, case-insensitive.
    pub fn parse(value: &str) -> Result<Self, QrError> {
        let invalid = || QrError::InvalidColor(value.to_string());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map_err(|_| invalid());
        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::opaque(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => Ok(Self::opaque(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
            _ => Err(invalid()),
        }
    }

    /// Compare by RGB channels only; alpha and textual form are ignored
    pub fn same_rgb(&self, other: &Rgba) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Same color with alpha scaled by `coverage` in `[0, 1]`
    pub fn with_coverage(self, coverage: f32) -> Self {
        let a = (self.a as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Composite `self` over `dst` (Porter-Duff source-over)
    pub fn over(self, dst: Rgba) -> Rgba {
        if self.a == 255 || dst.a == 0 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }
        let sa = self.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let blend = |s: u8, d: u8| {
            let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: blend(self.r, dst.r),
            g: blend(self.g, dst.g),
            b: blend(self.b, dst.b),
            a: (out_a * 255.0).round() as u8,
        }
    }

    /// Channels in `image` crate order
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from `image` crate channel order
    pub fn from_array(px: [u8; 4]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }
}

impl FromStr for Rgba {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
