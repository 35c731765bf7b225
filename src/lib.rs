//! stillmotion turns a text prompt into a short video.
//!
//! An external text-to-image model synthesizes one still; stillmotion animates it with a slow
//! centered zoom and encodes the frames to MP4 with the system `ffmpeg` binary.
//!
//! # Pipeline overview
//!
//! 1. **Synthesize**: `prompt -> RasterImage` through an [`ImageSource`] behind a serialized
//!    [`ImageSourceHandle`]
//! 2. **Animate**: `RasterImage + AnimationSpec -> Frame*` ([`frame_at`] is pure per index)
//! 3. **Encode**: frames are streamed in index order into an [`FfmpegEncoder`]
//! 4. **Transport**: the scoped [`VideoArtifact`] is read back, deleted, and returned as base64
//!
//! The HTTP surface lives in [`server`]; [`VideoGenerator`] is the transport-independent entry
//! point and reports failures per phase through [`GenerateError`].
#![forbid(unsafe_code)]

mod animation;
mod encode;
mod foundation;
mod http;
mod raster;
mod service;
mod source;

pub mod config;
pub mod observability;
pub mod server;

pub use animation::driver::{
    AnimateStats, AnimateThreading, AnimateToMp4Opts, FrameSink, animate, animate_frames,
    animate_to_mp4,
};
pub use animation::spec::{AnimationSpec, ZoomRange};
pub use animation::warp::warp_affine;
pub use animation::zoom::{Frame, frame_at, zoom_affine};
pub use encode::artifact::{EncodedVideo, ScratchFile, ScratchSpace, VideoArtifact};
pub use encode::ffmpeg::{
    EncodeConfig, FfmpegEncoder, default_mp4_config, ensure_parent_dir, is_ffmpeg_on_path,
};
pub use encode::renderer::{Mp4Renderer, VideoRenderer};
pub use foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Vec2};
pub use foundation::error::{StillError, StillResult};
pub use http::AppState;
pub use http::dto::{ErrorBody, StatusMessage, VideoRequest, VideoResponse};
pub use http::router::create_router;
pub use raster::buffer::{PixelLayout, RasterImage};
pub use raster::decode::{decode_image, load_image, save_png};
pub use service::{GenerateError, VideoGenerator};
pub use source::file::FileImageSource;
pub use source::handle::ImageSourceHandle;
pub use source::http::HttpImageSource;
pub use source::{ImageSource, ImageSourceError, load_image_source};
