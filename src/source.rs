//! Text-to-image collaborators.
//!
//! Synthesis itself happens outside this crate; an [`ImageSource`] only adapts some external
//! capability to `synthesize(prompt) -> RasterImage`.

pub(crate) mod file;
pub(crate) mod handle;
pub(crate) mod http;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{ImageSourceConfig, SourceKind},
    raster::buffer::RasterImage,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageSourceError {
    /// The source failed to initialize or cannot be reached at all.
    #[error("image source unavailable: {0}")]
    Unavailable(String),

    /// The source was reachable but synthesis failed for this prompt.
    #[error("image generation failed: {0}")]
    Generation(String),
}

impl ImageSourceError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }
}

#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Short human-readable description for logs.
    fn describe(&self) -> String;

    async fn synthesize(&self, prompt: &str) -> Result<RasterImage, ImageSourceError>;
}

/// Build the configured source. Failures surface as [`ImageSourceError::Unavailable`].
pub async fn load_image_source(
    cfg: &ImageSourceConfig,
) -> Result<Arc<dyn ImageSource>, ImageSourceError> {
    match cfg.kind {
        SourceKind::Http => Ok(Arc::new(http::HttpImageSource::connect(cfg).await?)),
        SourceKind::File => {
            let path = cfg.path.as_deref().ok_or_else(|| {
                ImageSourceError::unavailable("image_source.path is not configured")
            })?;
            Ok(Arc::new(file::FileImageSource::load(path)?))
        }
    }
}
