//! Module matrix to RGBA raster
//!
//! Both styles produce a square canvas of `matrix.size() * pixel_size`
//! pixels per side. Rows are painted in parallel; every pixel belongs to
//! exactly one module cell, so no row ever reads another row's output.

use crate::error::{QrError, Result};
use crate::models::{ModuleMatrix, RasterImage, RenderConfig, Rgba, Style};
use rayon::prelude::*;

/// Subsamples per axis used for circle edge coverage
const SUBSAMPLES: usize = 4;

/// Side of the canvas for `modules` cells of `pixel_size` pixels.
///
/// Fails with `InvalidInput` when the side does not fit in `u32` or the
/// RGBA buffer size does not fit in `usize`.
pub fn canvas_side(modules: usize, pixel_size: u32) -> Result<u32> {
    let too_large = || {
        QrError::InvalidInput(format!(
            "{modules} modules at pixel size {pixel_size} exceed the addressable image size"
        ))
    };
    let side = modules
        .checked_mul(pixel_size as usize)
        .and_then(|side| u32::try_from(side).ok())
        .ok_or_else(too_large)?;
    (side as usize)
        .checked_mul(side as usize)
        .and_then(|area| area.checked_mul(4))
        .ok_or_else(too_large)?;
    Ok(side)
}

/// Render `matrix` with the style, colors and pixel size in `config`
pub fn rasterize(matrix: &ModuleMatrix, config: &RenderConfig) -> Result<RasterImage> {
    let side = canvas_side(matrix.size(), config.pixel_size())?;
    let ps = config.pixel_size() as usize;
    let fg = config.foreground();
    let bg = config.effective_background();

    tracing::debug!(
        modules = matrix.size(),
        pixel_size = ps,
        style = ?config.style(),
        "rasterizing"
    );

    match config.style() {
        Style::Standard => paint(matrix, side, ps, |dark, _| if dark { fg } else { bg }),
        Style::Bubble => {
            let mask = circle_mask(ps);
            paint(matrix, side, ps, |dark, local| {
                if dark {
                    fg.with_coverage(mask[local]).over(bg)
                } else {
                    bg
                }
            })
        }
    }
}

/// Paint every pixel by asking `shade(dark, local_index)` for its color,
/// where `local_index` is the row-major position inside the module cell.
fn paint<F>(matrix: &ModuleMatrix, side: u32, ps: usize, shade: F) -> Result<RasterImage>
where
    F: Fn(bool, usize) -> Rgba + Sync,
{
    let width = side as usize;
    let mut buf = vec![0u8; width * width * 4];

    if width > 0 {
        buf.par_chunks_mut(width * 4).enumerate().for_each(|(y, row)| {
            let my = y / ps;
            let ly = y % ps;
            for (mx, cell) in row.chunks_exact_mut(ps * 4).enumerate() {
                let dark = matrix.get(mx, my);
                for (lx, px) in cell.chunks_exact_mut(4).enumerate() {
                    px.copy_from_slice(&shade(dark, ly * ps + lx).to_array());
                }
            }
        });
    }

    RasterImage::from_raw(side, side, buf).ok_or_else(|| {
        QrError::InvalidInput(format!("raster buffer does not match {side}x{side}"))
    })
}

/// Per-pixel coverage of a circle inscribed in a `ps`×`ps` cell.
///
/// Center at the cell center, radius `ps / 2`. A one-pixel cell is a
/// single fully covered pixel.
pub(crate) fn circle_mask(ps: usize) -> Vec<f32> {
    if ps <= 1 {
        return vec![1.0; ps];
    }

    let center = ps as f32 / 2.0;
    let r2 = center * center;
    let step = 1.0 / SUBSAMPLES as f32;
    let total = (SUBSAMPLES * SUBSAMPLES) as f32;
    let mut mask = Vec::with_capacity(ps * ps);

    for ly in 0..ps {
        for lx in 0..ps {
            let mut inside = 0usize;
            for sy in 0..SUBSAMPLES {
                let dy = ly as f32 + (sy as f32 + 0.5) * step - center;
                for sx in 0..SUBSAMPLES {
                    let dx = lx as f32 + (sx as f32 + 0.5) * step - center;
                    if dx * dx + dy * dy <= r2 {
                        inside += 1;
                    }
                }
            }
            mask.push(inside as f32 / total);
        }
    }

    mask
}
