use crate::foundation::{
    core::{FrameIndex, Fps},
    error::{StillError, StillResult},
    math::lerp,
};

/// Scale factors at the start and (asymptotic) end of the animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ZoomRange {
    pub start: f64,
    pub end: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            start: 1.0,
            end: 1.2,
        }
    }
}

impl ZoomRange {
    /// Build a validated range.
    pub fn new(start: f64, end: f64) -> StillResult<Self> {
        let zoom = Self { start, end };
        zoom.validate()?;
        Ok(zoom)
    }

    /// Both scales finite, `start > 0` and `end > start`.
    pub fn validate(&self) -> StillResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(StillError::validation("zoom scales must be finite"));
        }
        if self.start <= 0.0 {
            return Err(StillError::validation("zoom start must be > 0"));
        }
        if self.end <= self.start {
            return Err(StillError::validation(format!(
                "zoom end ({}) must be greater than zoom start ({})",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

/// Timing and zoom parameters for one animation pass.
///
/// The frame count is `round(duration_secs * fps)` and the interpolation factor for frame `i`
/// is `i / frame_count`, so it spans `[0, 1)`: the last frame stops one step short of
/// `zoom.end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationSpec {
    duration_secs: f64,
    fps: Fps,
    zoom: ZoomRange,
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self {
            duration_secs: Self::DEFAULT_DURATION_SECS,
            fps: Fps::default(),
            zoom: ZoomRange::default(),
        }
    }
}

impl AnimationSpec {
    pub const DEFAULT_DURATION_SECS: f64 = 5.0;
    pub const DEFAULT_FPS: u32 = 24;

    /// Build a validated spec.
    pub fn new(duration_secs: f64, fps: u32, zoom: ZoomRange) -> StillResult<Self> {
        let spec = Self {
            duration_secs,
            fps: Fps::new(fps)?,
            zoom,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> StillResult<()> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(StillError::validation(format!(
                "duration must be a positive number of seconds, got {}",
                self.duration_secs
            )));
        }
        self.zoom.validate()?;
        if self.frame_count() < 1 {
            return Err(StillError::validation(format!(
                "{}s at {} fps yields no frames",
                self.duration_secs,
                self.fps.get()
            )));
        }
        Ok(())
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn zoom(&self) -> ZoomRange {
        self.zoom
    }

    /// `round(duration_secs * fps)`.
    pub fn frame_count(&self) -> u64 {
        (self.duration_secs * self.fps.as_f64()).round() as u64
    }

    /// Whether `index` lies in `0..frame_count`.
    pub fn contains(&self, index: FrameIndex) -> bool {
        index.0 < self.frame_count()
    }

    /// `index / frame_count`, or 0 for a single-frame animation.
    pub fn interp_factor(&self, index: FrameIndex) -> f64 {
        let n = self.frame_count();
        if n <= 1 {
            return 0.0;
        }
        index.0 as f64 / n as f64
    }

    /// Zoom scale applied to frame `index`.
    pub fn scale_at(&self, index: FrameIndex) -> f64 {
        lerp(self.zoom.start, self.zoom.end, self.interp_factor(index))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spec.rs"]
mod tests;
