//! Affine resampling of a [`RasterImage`] onto a same-sized canvas.
//!
//! Destination pixel `(x, y)` samples the source at `transform⁻¹ · (x, y)` with bilinear
//! interpolation. Coordinates that land outside the source are clamped to the nearest edge
//! (replicate-edge border), so the output never contains undefined pixels.

use crate::{
    foundation::{
        core::{Affine, Point},
        error::{StillError, StillResult},
        math::quantize_u8,
    },
    raster::buffer::RasterImage,
};

const MIN_DETERMINANT: f64 = 1e-12;

/// Resample `src` through `transform` (source space → destination space).
pub fn warp_affine(src: &RasterImage, transform: Affine) -> StillResult<RasterImage> {
    let det = transform.determinant();
    if !det.is_finite() || det.abs() < MIN_DETERMINANT {
        return Err(StillError::validation(format!(
            "warp transform is not invertible (determinant {det})"
        )));
    }
    let inverse = transform.inverse();

    RasterImage::from_fn(src.width(), src.height(), src.layout(), |x, y, out| {
        let p = inverse * Point::new(f64::from(x), f64::from(y));
        sample_bilinear(src, p.x, p.y, out);
    })
}

fn sample_bilinear(src: &RasterImage, sx: f64, sy: f64, out: &mut [u8]) {
    let max_x = f64::from(src.width() - 1);
    let max_y = f64::from(src.height() - 1);
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);

    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = (sx - x0) as f32;
    let fy = (sy - y0) as f32;

    let x0 = x0 as u32;
    let y0 = y0 as u32;
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);

    let p00 = src.pixel(x0, y0);
    let p10 = src.pixel(x1, y0);
    let p01 = src.pixel(x0, y1);
    let p11 = src.pixel(x1, y1);

    for (c, dst) in out.iter_mut().enumerate() {
        let top = f32::from(p00[c]) * (1.0 - fx) + f32::from(p10[c]) * fx;
        let bottom = f32::from(p01[c]) * (1.0 - fx) + f32::from(p11[c]) * fx;
        *dst = quantize_u8(top * (1.0 - fy) + bottom * fy);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/warp.rs"]
mod tests;
