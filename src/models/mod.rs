pub mod color;
pub mod matrix;
pub mod render_config;

pub use color::Rgba;
pub use matrix::ModuleMatrix;
pub use render_config::{EccLevel, RenderConfig, Style};

/// Row-major RGBA pixel buffer produced by the rasterizer
pub type RasterImage = image::RgbaImage;
