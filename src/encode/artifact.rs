use std::path::{Path, PathBuf};

use crate::foundation::{
    core::{Canvas, Fps},
    error::{StillError, StillResult},
};

/// Directory holding per-request video artifacts.
#[derive(Clone, Debug)]
pub struct ScratchSpace {
    dir: PathBuf,
}

impl ScratchSpace {
    /// Use `dir` for artifacts, creating it (and its parents) when missing.
    pub fn new(dir: impl Into<PathBuf>) -> StillResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StillError::encoding(format!(
                "failed to create scratch directory '{}': {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Directory artifacts are allocated in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reserve a unique path in the scratch directory. Nothing is created on disk yet.
    pub fn allocate(&self, extension: &str) -> ScratchFile {
        let name = format!("{}.{extension}", uuid::Uuid::new_v4());
        ScratchFile(Some(self.dir.join(name)))
    }
}

/// Path whose file is removed when the guard drops, on success and error paths alike.
#[derive(Debug)]
pub struct ScratchFile(Option<PathBuf>);

impl ScratchFile {
    /// Guarded path. Empty once the guard has released it.
    pub fn path(&self) -> &Path {
        self.0.as_deref().unwrap_or_else(|| Path::new(""))
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Some(path) = self.0.take()
            && let Err(e) = std::fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %path.display(), "failed to remove scratch file: {e}");
        }
    }
}

/// Encoded video fully read into memory, ready for transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedVideo {
    pub bytes: Vec<u8>,
    pub frame_count: u64,
    pub fps: Fps,
    pub canvas: Canvas,
}

/// A finished video file owned by one request.
#[derive(Debug)]
pub struct VideoArtifact {
    file: ScratchFile,
    frame_count: u64,
    fps: Fps,
    canvas: Canvas,
}

impl VideoArtifact {
    /// Wrap an encoded file together with what was written into it.
    pub fn new(file: ScratchFile, frame_count: u64, fps: Fps, canvas: Canvas) -> Self {
        Self {
            file,
            frame_count,
            fps,
            canvas,
        }
    }

    /// On-disk location, valid while the artifact is alive.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of frames encoded.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Encoded frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frame dimensions before any encoder padding.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Read the artifact back into memory. The backing file is deleted afterwards.
    pub fn into_encoded(self) -> StillResult<EncodedVideo> {
        let bytes = std::fs::read(self.file.path()).map_err(|e| {
            StillError::encoding(format!(
                "failed to read video artifact '{}': {e}",
                self.file.path().display()
            ))
        })?;

        Ok(EncodedVideo {
            bytes,
            frame_count: self.frame_count,
            fps: self.fps,
            canvas: self.canvas,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/artifact.rs"]
mod tests;
