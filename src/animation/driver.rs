use rayon::prelude::*;

use crate::{
    animation::{
        spec::AnimationSpec,
        zoom::{Frame, frame_at},
    },
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    foundation::{
        core::{Canvas, FrameIndex, Fps},
        error::{StillError, StillResult},
    },
    raster::buffer::RasterImage,
};

/// Ordered consumer of animated frames (an encoder, or an in-memory collector).
///
/// `animate` calls `write_frame` with strictly increasing indices, starting at 0.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Frame) -> StillResult<()>;
}

impl FrameSink for Vec<Frame> {
    fn write_frame(&mut self, frame: &Frame) -> StillResult<()> {
        self.push(frame.clone());
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct AnimateThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for AnimateThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 32,
            threads: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimateStats {
    pub frames_written: u64,
    pub canvas: Canvas,
    pub fps: Fps,
}

/// Generate every frame of `spec` from `base` and hand them to `sink` in index order.
///
/// With `threading.parallel`, frames of each chunk are computed on a rayon pool and written
/// sequentially afterwards; the output is identical to the sequential path.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(width = base.width(), height = base.height(), frames = spec.frame_count())
)]
pub fn animate(
    base: &RasterImage,
    spec: &AnimationSpec,
    sink: &mut dyn FrameSink,
    threading: &AnimateThreading,
) -> StillResult<AnimateStats> {
    spec.validate()?;
    let frame_count = spec.frame_count();
    tracing::info!("creating animation with {frame_count} frames");

    let mut stats = AnimateStats {
        frames_written: 0,
        canvas: base.canvas(),
        fps: spec.fps(),
    };

    if !threading.parallel {
        for i in 0..frame_count {
            sink.write_frame(&frame_at(base, FrameIndex(i), spec)?)?;
            stats.frames_written += 1;
        }
        return Ok(stats);
    }

    let pool = build_thread_pool(threading.threads)?;
    let chunk_size = normalized_chunk_size(threading.chunk_size);
    let mut chunk_start = 0u64;
    while chunk_start < frame_count {
        let chunk_end = (chunk_start + chunk_size).min(frame_count);
        let frames = pool.install(|| {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|i| frame_at(base, FrameIndex(i), spec))
                .collect::<StillResult<Vec<_>>>()
        })?;
        for frame in &frames {
            sink.write_frame(frame)?;
            stats.frames_written += 1;
        }
        chunk_start = chunk_end;
    }

    Ok(stats)
}

/// Collect all frames in memory.
pub fn animate_frames(base: &RasterImage, spec: &AnimationSpec) -> StillResult<Vec<Frame>> {
    let mut frames = Vec::with_capacity(spec.frame_count().min(4096) as usize);
    animate(base, spec, &mut frames, &AnimateThreading::default())?;
    Ok(frames)
}

/// Options for [`animate_to_mp4`].
#[derive(Clone, Debug)]
pub struct AnimateToMp4Opts {
    /// Whether to overwrite `out_path` if it already exists.
    pub overwrite: bool,
    pub threading: AnimateThreading,
}

impl Default for AnimateToMp4Opts {
    fn default() -> Self {
        Self {
            overwrite: true,
            threading: AnimateThreading::default(),
        }
    }
}

/// Animate `base` and encode the frames to an MP4 through the system `ffmpeg` binary.
///
/// Nothing is spawned when the input fails validation. On an encoding failure the child
/// process is killed; the partially written file is left for the caller to clean up.
pub fn animate_to_mp4(
    base: &RasterImage,
    spec: &AnimationSpec,
    out_path: impl Into<std::path::PathBuf>,
    opts: AnimateToMp4Opts,
) -> StillResult<AnimateStats> {
    spec.validate()?;

    let cfg = EncodeConfig {
        width: base.width(),
        height: base.height(),
        fps: spec.fps().get(),
        layout: base.layout(),
        out_path: out_path.into(),
        overwrite: opts.overwrite,
    };

    let mut enc = FfmpegEncoder::new(cfg)?;
    let stats = animate(base, spec, &mut enc, &opts.threading)?;
    enc.finish()?;
    Ok(stats)
}

fn build_thread_pool(threads: Option<usize>) -> StillResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StillError::validation(
            "animation threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StillError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/driver.rs"]
mod tests;
