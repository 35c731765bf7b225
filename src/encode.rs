pub(crate) mod artifact;
pub(crate) mod ffmpeg;
pub(crate) mod renderer;
