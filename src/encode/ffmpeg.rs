use std::{
    io::Read as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
    thread::JoinHandle,
};

use crate::{
    animation::{driver::FrameSink, zoom::Frame},
    foundation::{
        core::FrameIndex,
        error::{StillError, StillResult},
    },
    raster::buffer::PixelLayout,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub layout: PixelLayout,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    /// Reject zero dimensions and a zero frame rate before anything is spawned.
    pub fn validate(&self) -> StillResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StillError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(StillError::validation("encode fps must be non-zero"));
        }
        Ok(())
    }

    /// yuv420p needs even dimensions; odd inputs get one padding row/column instead of a
    /// rescale, so frame pixels stay untouched.
    fn needs_padding(&self) -> bool {
        !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2)
    }

    fn input_pix_fmt(&self) -> &'static str {
        match self.layout {
            PixelLayout::Rgb8 => "rgb24",
            PixelLayout::Rgba8 => "rgba",
        }
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * self.layout.channels()
    }

    pub(crate) fn ffmpeg_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            if self.overwrite { "-y" } else { "-n" }.to_string(),
            "-loglevel".into(),
            "error".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pix_fmt".into(),
            self.input_pix_fmt().into(),
            "-s".into(),
            format!("{}x{}", self.width, self.height),
            "-r".into(),
            self.fps.to_string(),
            "-i".into(),
            "pipe:0".into(),
            "-an".into(),
        ];
        if self.needs_padding() {
            args.extend(["-vf".into(), "pad=ceil(iw/2)*2:ceil(ih/2)*2".into()]);
        }
        args.extend(
            [
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
                "-f",
                "mp4",
            ]
            .map(String::from),
        );
        args
    }
}

/// RGB8 input, overwrite enabled.
pub fn default_mp4_config(
    out_path: impl Into<PathBuf>,
    width: u32,
    height: u32,
    fps: u32,
) -> EncodeConfig {
    EncodeConfig {
        width,
        height,
        fps,
        layout: PixelLayout::Rgb8,
        out_path: out_path.into(),
        overwrite: true,
    }
}

/// Whether `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> StillResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            StillError::encoding(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Streams raw frames into a system `ffmpeg` process producing H.264/MP4.
///
/// Dropping an encoder without calling [`FfmpegEncoder::finish`] kills the child process.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    scratch: Vec<u8>,
    frames_written: u64,
    last_idx: Option<FrameIndex>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig) -> StillResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(StillError::encoding(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }

        if !is_ffmpeg_on_path() {
            return Err(StillError::encoding(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(cfg.ffmpeg_args())
            .arg(&cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            StillError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| StillError::encoding("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StillError::encoding("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            width = cfg.width,
            height = cfg.height,
            fps = cfg.fps,
            out = %cfg.out_path.display(),
            "ffmpeg encoder started"
        );

        Ok(Self {
            scratch: vec![0u8; cfg.frame_len()],
            cfg,
            child: Some(child),
            stdin: Some(stdin),
            stderr_drain: Some(stderr_drain),
            frames_written: 0,
            last_idx: None,
        })
    }

    /// Number of frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Write one frame. Indices must be strictly increasing across calls.
    pub fn encode_frame(&mut self, frame: &Frame) -> StillResult<()> {
        check_frame_order(self.last_idx, frame.index)?;
        let img = &frame.image;
        if img.width() != self.cfg.width || img.height() != self.cfg.height {
            return Err(StillError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                img.width(),
                img.height(),
                self.cfg.width,
                self.cfg.height
            )));
        }
        if img.layout() != self.cfg.layout {
            return Err(StillError::validation(format!(
                "frame layout mismatch: got {:?}, expected {:?}",
                img.layout(),
                self.cfg.layout
            )));
        }

        let bytes: &[u8] = match self.cfg.layout {
            PixelLayout::Rgb8 => img.as_bytes(),
            PixelLayout::Rgba8 => {
                flatten_to_opaque_rgba8(&mut self.scratch, img.as_bytes())?;
                &self.scratch
            }
        };

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(StillError::encoding("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(bytes).map_err(|e| {
            StillError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;

        self.last_idx = Some(frame.index);
        self.frames_written += 1;
        Ok(())
    }

    /// Close stdin, wait for ffmpeg and fail on a non-zero exit status.
    pub fn finish(mut self) -> StillResult<()> {
        drop(self.stdin.take());

        let Some(mut child) = self.child.take() else {
            return Err(StillError::encoding("ffmpeg encoder is already finalized"));
        };

        let status = child.wait().map_err(|e| {
            StillError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| StillError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| StillError::encoding(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StillError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        tracing::debug!(frames = self.frames_written, "ffmpeg encoder finished");
        Ok(())
    }
}

impl FrameSink for FfmpegEncoder {
    fn write_frame(&mut self, frame: &Frame) -> StillResult<()> {
        self.encode_frame(frame)
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

/// Frames reach the encoder strictly by increasing index; repeats and rewinds are rejected.
fn check_frame_order(last: Option<FrameIndex>, next: FrameIndex) -> StillResult<()> {
    if let Some(last) = last
        && next.0 <= last.0
    {
        return Err(StillError::validation(format!(
            "out-of-order frame index {} after {}",
            next.0, last.0
        )));
    }
    Ok(())
}

/// Composite straight-alpha RGBA8 over opaque black; the encoder drops alpha otherwise.
fn flatten_to_opaque_rgba8(dst: &mut [u8], src: &[u8]) -> StillResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(StillError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        d[0] = mul_div255(u16::from(s[0]), a) as u8;
        d[1] = mul_div255(u16::from(s[1]), a) as u8;
        d[2] = mul_div255(u16::from(s[2]), a) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
