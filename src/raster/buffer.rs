use std::sync::Arc;

use crate::foundation::{
    core::Canvas,
    error::{StillError, StillResult},
};

/// Channel layout of a [`RasterImage`]. Constant across the whole image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelLayout {
    Rgb8,
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Immutable, cheaply cloneable pixel grid (row-major, tightly packed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    canvas: Canvas,
    layout: PixelLayout,
    data: Arc<[u8]>,
}

impl RasterImage {
    /// Wrap tightly packed pixel data. The length must equal `width * height * channels`.
    pub fn new(width: u32, height: u32, layout: PixelLayout, data: Vec<u8>) -> StillResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let expected = canvas.pixel_count() * layout.channels();
        if data.len() != expected {
            return Err(StillError::validation(format!(
                "raster data length {} does not match {width}x{height}x{}",
                data.len(),
                layout.channels()
            )));
        }
        Ok(Self {
            canvas,
            layout,
            data: data.into(),
        })
    }

    /// Build an image by evaluating `f(x, y, pixel_out)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        layout: PixelLayout,
        mut f: impl FnMut(u32, u32, &mut [u8]),
    ) -> StillResult<Self> {
        let canvas = Canvas::new(width, height)?;
        let ch = layout.channels();
        let mut data = vec![0u8; canvas.pixel_count() * ch];
        for (i, px) in data.chunks_exact_mut(ch).enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            f(x, y, px);
        }
        Self::new(width, height, layout, data)
    }

    /// Image filled with a single pixel value.
    pub fn solid(width: u32, height: u32, layout: PixelLayout, px: &[u8]) -> StillResult<Self> {
        if px.len() != layout.channels() {
            return Err(StillError::validation(format!(
                "solid pixel has {} channels, layout needs {}",
                px.len(),
                layout.channels()
            )));
        }
        Self::from_fn(width, height, layout, |_, _, out| out.copy_from_slice(px))
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Raw row-major bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Channel slice for the pixel at `(x, y)`.
    ///
    /// Panics when the coordinate lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(
            x < self.canvas.width && y < self.canvas.height,
            "pixel ({x}, {y}) outside {}x{}",
            self.canvas.width,
            self.canvas.height
        );
        let ch = self.channels();
        let off = (y as usize * self.canvas.width as usize + x as usize) * ch;
        &self.data[off..off + ch]
    }

    /// Convert a decoded `image` buffer, keeping alpha only when the source has it.
    pub fn from_dynamic(img: image::DynamicImage) -> StillResult<Self> {
        if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            Self::new(w, h, PixelLayout::Rgba8, rgba.into_raw())
        } else {
            let rgb = img.to_rgb8();
            let (w, h) = rgb.dimensions();
            Self::new(w, h, PixelLayout::Rgb8, rgb.into_raw())
        }
    }

    /// Copy into an `image` buffer for saving.
    pub fn to_dynamic(&self) -> StillResult<image::DynamicImage> {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let raw = self.data.to_vec();
        let img = match self.layout {
            PixelLayout::Rgb8 => {
                image::RgbImage::from_raw(w, h, raw).map(image::DynamicImage::ImageRgb8)
            }
            PixelLayout::Rgba8 => {
                image::RgbaImage::from_raw(w, h, raw).map(image::DynamicImage::ImageRgba8)
            }
        };
        img.ok_or_else(|| StillError::validation("raster buffer does not fit its dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
