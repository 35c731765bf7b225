use crate::{
    animation::{
        driver::{AnimateThreading, AnimateToMp4Opts, animate_to_mp4},
        spec::AnimationSpec,
    },
    encode::artifact::{EncodedVideo, ScratchSpace, VideoArtifact},
    foundation::error::StillResult,
    raster::buffer::RasterImage,
};

/// Turns one still into encoded video bytes.
///
/// Implementations are blocking and CPU-bound; async callers run them on a blocking pool.
pub trait VideoRenderer: Send + Sync {
    fn render(&self, base: &RasterImage, spec: &AnimationSpec) -> StillResult<EncodedVideo>;
}

/// Zoom animation encoded to MP4 through a scoped scratch file.
#[derive(Clone, Debug)]
pub struct Mp4Renderer {
    scratch: ScratchSpace,
    threading: AnimateThreading,
}

impl Mp4Renderer {
    pub fn new(scratch: ScratchSpace, threading: AnimateThreading) -> Self {
        Self { scratch, threading }
    }

    pub fn scratch(&self) -> &ScratchSpace {
        &self.scratch
    }

    /// Encode into a scratch artifact. The file disappears with the returned value, or
    /// immediately if encoding fails.
    pub fn render_artifact(
        &self,
        base: &RasterImage,
        spec: &AnimationSpec,
    ) -> StillResult<VideoArtifact> {
        let file = self.scratch.allocate("mp4");
        if !base.canvas().is_even() {
            tracing::debug!(
                width = base.width(),
                height = base.height(),
                "odd canvas, encoder pads to even dimensions"
            );
        }
        let opts = AnimateToMp4Opts {
            overwrite: true,
            threading: self.threading.clone(),
        };
        let stats = animate_to_mp4(base, spec, file.path(), opts)?;
        tracing::info!(
            frames = stats.frames_written,
            path = %file.path().display(),
            "video artifact written"
        );
        Ok(VideoArtifact::new(
            file,
            stats.frames_written,
            stats.fps,
            stats.canvas,
        ))
    }
}

impl VideoRenderer for Mp4Renderer {
    fn render(&self, base: &RasterImage, spec: &AnimationSpec) -> StillResult<EncodedVideo> {
        self.render_artifact(base, spec)?.into_encoded()
    }
}
