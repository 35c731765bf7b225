use crate::foundation::error::{StillError, StillResult};

pub use kurbo::{Affine, Point, Vec2};

/// Zero-based index of a frame within one animation pass.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Integer frame rate. Encoded artifacts carry exactly this rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps(u32);

impl Fps {
    /// Create a frame rate. Zero is rejected.
    pub fn new(fps: u32) -> StillResult<Self> {
        if fps == 0 {
            return Err(StillError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Frames per second as an integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Frames per second as `f64`.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Duration covered by `frames` frames, in seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) / self.as_f64()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(24)
    }
}

/// Pixel dimensions shared by a source still and every frame derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Create a canvas. Both dimensions must be positive.
    pub fn new(width: u32, height: u32) -> StillResult<Self> {
        if width == 0 || height == 0 {
            return Err(StillError::validation(format!(
                "canvas dimensions must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Geometric center `(width / 2, height / 2)`, the fixed point of the zoom.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// `width * height`.
    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether both dimensions are even (required by yuv420p).
    pub fn is_even(self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
