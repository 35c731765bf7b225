use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::ImageSourceConfig,
    raster::buffer::RasterImage,
    source::{ImageSource, ImageSourceError, load_image_source},
};

enum SourceState {
    Ready {
        source: Arc<dyn ImageSource>,
        gate: Mutex<()>,
    },
    Unavailable {
        reason: String,
    },
}

/// Process-wide handle on the image source, created at startup and shut down at exit.
///
/// A failed load does not abort startup: the handle stays `Unavailable` and callers report
/// the source as unavailable per request. Synthesis calls are serialized, one at a time,
/// since inference back-ends are not assumed to tolerate concurrent use.
pub struct ImageSourceHandle {
    state: SourceState,
}

impl ImageSourceHandle {
    /// Handle over a loaded source.
    pub fn ready(source: Arc<dyn ImageSource>) -> Self {
        Self {
            state: SourceState::Ready {
                source,
                gate: Mutex::new(()),
            },
        }
    }

    /// Handle that reports `reason` for every request.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: SourceState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Load the configured source. Failures are logged and produce an unavailable handle.
    pub async fn load(cfg: &ImageSourceConfig) -> Self {
        tracing::info!(kind = ?cfg.kind, "loading image source");
        match load_image_source(cfg).await {
            Ok(source) => {
                tracing::info!("image source loaded: {}", source.describe());
                Self::ready(source)
            }
            Err(e) => {
                tracing::error!("failed to load image source: {e}");
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.state, SourceState::Ready { .. })
    }

    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.state {
            SourceState::Ready { .. } => None,
            SourceState::Unavailable { reason } => Some(reason),
        }
    }

    /// Synthesize one still, waiting for any call already in flight.
    pub async fn synthesize(&self, prompt: &str) -> Result<RasterImage, ImageSourceError> {
        match &self.state {
            SourceState::Unavailable { reason } => {
                Err(ImageSourceError::unavailable(reason.clone()))
            }
            SourceState::Ready { source, gate } => {
                let _turn = gate.lock().await;
                source.synthesize(prompt).await
            }
        }
    }

    /// Release the source at process exit.
    pub fn shutdown(self) {
        if let SourceState::Ready { source, .. } = self.state {
            tracing::info!("image source unloaded: {}", source.describe());
        }
    }
}

impl std::fmt::Debug for ImageSourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            SourceState::Ready { source, .. } => f
                .debug_struct("ImageSourceHandle")
                .field("source", &source.describe())
                .finish(),
            SourceState::Unavailable { reason } => f
                .debug_struct("ImageSourceHandle")
                .field("unavailable", reason)
                .finish(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/handle.rs"]
mod tests;
