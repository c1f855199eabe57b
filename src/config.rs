//! Service settings: TOML file, then `QR_*` environment overrides

use crate::encoder::DEFAULT_QUIET_ZONE;
use crate::error::{QrError, Result};
use crate::models::EccLevel;
use crate::render::compositor::LOGO_RATIO;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Variable lookup, `std::env::var` outside of tests
type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_env<T: std::str::FromStr>(env: EnvLookup, name: &str) -> Option<T> {
    env(name).and_then(|v| v.trim().parse::<T>().ok())
}

fn parse_env_u32(env: EnvLookup, name: &str, default: u32) -> u32 {
    parse_env(env, name).unwrap_or(default)
}

fn parse_env_usize(env: EnvLookup, name: &str, default: usize) -> usize {
    parse_env(env, name).unwrap_or(default)
}

fn parse_env_u8(env: EnvLookup, name: &str, default: u8) -> u8 {
    parse_env(env, name).unwrap_or(default)
}

fn parse_env_i32(env: EnvLookup, name: &str, default: i32) -> i32 {
    parse_env(env, name).unwrap_or(default)
}

/// Tunables of the preprocessing fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Luminance strictly above this becomes foreground; must be below 255
    pub threshold: u8,
    /// Output intensity of foreground pixels, clamped to 0..=255 on use
    pub foreground_value: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            threshold: 128,
            foreground_value: 255,
        }
    }
}

/// Settings for a [`crate::QrService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pixel size used when a request leaves it out
    pub default_pixel_size: u32,
    /// Largest accepted pixel size
    pub max_pixel_size: u32,
    /// Largest accepted output side in pixels, checked once the symbol size is known
    pub max_image_side: u32,
    /// Error correction level for generated symbols
    pub ecc_level: EccLevel,
    /// Light border added around the symbol, in modules
    pub quiet_zone: usize,
    /// Logo side is canvas width divided by this
    pub logo_ratio: u32,
    /// Read fallback tunables
    pub preprocess: PreprocessConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_pixel_size: 20,
            max_pixel_size: 100,
            max_image_side: 4096,
            ecc_level: EccLevel::Q,
            quiet_zone: DEFAULT_QUIET_ZONE,
            logo_ratio: LOGO_RATIO,
            preprocess: PreprocessConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings = Self::parse_toml(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| QrError::Config(e.to_string()))
    }

    /// Read a TOML file, apply environment overrides, then validate the result
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, &process_env)
    }

    fn load_with_env(path: &Path, env: EnvLookup) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::parse_toml(&content)?.with_overrides_from(env);
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let settings = Self::default().with_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Overlay `QR_*` environment variables; unparsable values are ignored
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(&process_env)
    }

    fn with_overrides_from(self, env: EnvLookup) -> Self {
        Self {
            default_pixel_size: parse_env_u32(
                env,
                "QR_DEFAULT_PIXEL_SIZE",
                self.default_pixel_size,
            ),
            max_pixel_size: parse_env_u32(env, "QR_MAX_PIXEL_SIZE", self.max_pixel_size),
            max_image_side: parse_env_u32(env, "QR_MAX_IMAGE_SIDE", self.max_image_side),
            ecc_level: parse_env(env, "QR_ECC_LEVEL").unwrap_or(self.ecc_level),
            quiet_zone: parse_env_usize(env, "QR_QUIET_ZONE", self.quiet_zone),
            logo_ratio: self.logo_ratio,
            preprocess: PreprocessConfig {
                threshold: parse_env_u8(
                    env,
                    "QR_BINARIZE_THRESHOLD",
                    self.preprocess.threshold,
                ),
                foreground_value: parse_env_i32(
                    env,
                    "QR_BINARIZE_VALUE",
                    self.preprocess.foreground_value,
                ),
            },
        }
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.max_pixel_size == 0 {
            return Err(QrError::Config("max_pixel_size must be at least 1".into()));
        }
        if self.default_pixel_size == 0 || self.default_pixel_size > self.max_pixel_size {
            return Err(QrError::Config(format!(
                "default_pixel_size must be within 1..={}",
                self.max_pixel_size
            )));
        }
        if self.max_image_side == 0 {
            return Err(QrError::Config("max_image_side must be at least 1".into()));
        }
        if self.logo_ratio == 0 {
            return Err(QrError::Config("logo_ratio must be at least 1".into()));
        }
        if self.preprocess.threshold == u8::MAX {
            return Err(QrError::Config("binarization threshold must be below 255".into()));
        }
        Ok(())
    }
}
