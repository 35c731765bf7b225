use std::path::Path;

use anyhow::Context;

use crate::{foundation::error::StillResult, raster::buffer::RasterImage};

/// Decode encoded image bytes (PNG, JPEG, ...) into a [`RasterImage`].
pub fn decode_image(bytes: &[u8]) -> StillResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    RasterImage::from_dynamic(dyn_img)
}

/// Decode the image file at `path`.
pub fn load_image(path: &Path) -> StillResult<RasterImage> {
    let dyn_img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    RasterImage::from_dynamic(dyn_img)
}

/// Write `img` as PNG, creating the parent directory if needed.
pub fn save_png(img: &RasterImage, path: &Path) -> StillResult<()> {
    crate::encode::ffmpeg::ensure_parent_dir(path)?;
    img.to_dynamic()?
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/decode.rs"]
mod tests;
