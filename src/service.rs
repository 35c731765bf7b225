use std::sync::Arc;

use crate::{
    animation::spec::AnimationSpec,
    encode::{artifact::EncodedVideo, renderer::VideoRenderer},
    foundation::error::StillError,
    source::{ImageSourceError, handle::ImageSourceHandle},
};

/// Failure of one generate request, tagged with the phase it came from.
#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("image source is not available: {0}")]
    SourceUnavailable(String),

    #[error(transparent)]
    ImageSource(ImageSourceError),

    #[error("animation failed: {0}")]
    Animation(#[source] StillError),
}

/// Prompt → still → encoded video, one request at a time per call.
pub struct VideoGenerator {
    source: Arc<ImageSourceHandle>,
    renderer: Arc<dyn VideoRenderer>,
    spec: AnimationSpec,
}

impl VideoGenerator {
    pub fn new(
        source: Arc<ImageSourceHandle>,
        renderer: Arc<dyn VideoRenderer>,
        spec: AnimationSpec,
    ) -> Self {
        Self {
            source,
            renderer,
            spec,
        }
    }

    pub fn source(&self) -> &Arc<ImageSourceHandle> {
        &self.source
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    #[tracing::instrument(level = "debug", skip_all, fields(prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<EncodedVideo, GenerateError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }
        if let Some(reason) = self.source.unavailable_reason() {
            return Err(GenerateError::SourceUnavailable(reason.to_string()));
        }

        tracing::info!("generating video for prompt: '{prompt}'");
        let still = self
            .source
            .synthesize(prompt)
            .await
            .map_err(GenerateError::ImageSource)?;
        tracing::debug!(
            width = still.width(),
            height = still.height(),
            "still synthesized"
        );

        let renderer = Arc::clone(&self.renderer);
        let spec = self.spec;
        let video = tokio::task::spawn_blocking(move || renderer.render(&still, &spec))
            .await
            .map_err(|e| {
                GenerateError::Animation(StillError::Other(anyhow::anyhow!(
                    "animation task failed: {e}"
                )))
            })?
            .map_err(GenerateError::Animation)?;

        tracing::info!(
            frames = video.frame_count,
            bytes = video.bytes.len(),
            "video generated"
        );
        Ok(video)
    }
}

#[cfg(test)]
#[path = "../tests/unit/service.rs"]
mod tests;
