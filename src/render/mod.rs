//! Rendering: module matrix to styled raster, then logo compositing

pub mod compositor;
pub mod rasterizer;

pub use compositor::{LogoPlacement, overlay_logo};
pub use rasterizer::{canvas_side, rasterize};
