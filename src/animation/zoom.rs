use crate::{
    animation::{spec::AnimationSpec, warp::warp_affine},
    foundation::{
        core::{Affine, Canvas, FrameIndex},
        error::{StillError, StillResult},
    },
    raster::buffer::RasterImage,
};

/// One animated frame: the base still scaled about its center.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub index: FrameIndex,
    pub scale: f64,
    pub image: RasterImage,
}

/// Uniform scale about the canvas center. No rotation, no shear.
pub fn zoom_affine(canvas: Canvas, scale: f64) -> Affine {
    let center = canvas.center().to_vec2();
    Affine::translate(center) * Affine::scale(scale) * Affine::translate(-center)
}

/// Produce frame `index` of `spec` from `base`.
///
/// Pure in `(base, index, spec)`: frames do not depend on each other, so they can be computed
/// in any order as long as they are written out by increasing index.
pub fn frame_at(base: &RasterImage, index: FrameIndex, spec: &AnimationSpec) -> StillResult<Frame> {
    if !spec.contains(index) {
        return Err(StillError::validation(format!(
            "frame index {} out of range (frame_count = {})",
            index.0,
            spec.frame_count()
        )));
    }

    let scale = spec.scale_at(index);
    let image = warp_affine(base, zoom_affine(base.canvas(), scale))?;
    Ok(Frame {
        index,
        scale,
        image,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/zoom.rs"]
mod tests;
