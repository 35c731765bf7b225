use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    config::ImageSourceConfig,
    raster::{buffer::RasterImage, decode::decode_image},
    source::{ImageSource, ImageSourceError},
};

/// Client for a sidecar inference server that keeps a text-to-image model warm.
///
/// `POST {endpoint}` with a JSON [`SynthesisRequest`]; the response body is the encoded still
/// (PNG or JPEG). A refused connection reports the source as unavailable; any other failure
/// is a generation error.
#[derive(Clone, Debug)]
pub struct HttpImageSource {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    num_inference_steps: u32,
    guidance_scale: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct SynthesisRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

impl HttpImageSource {
    pub fn new(cfg: &ImageSourceConfig) -> Result<Self, ImageSourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ImageSourceError::unavailable(format!("build http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            num_inference_steps: cfg.num_inference_steps,
            guidance_scale: cfg.guidance_scale,
        })
    }

    /// Build the client and, when `health_url` is configured, require it to answer 2xx.
    pub async fn connect(cfg: &ImageSourceConfig) -> Result<Self, ImageSourceError> {
        let source = Self::new(cfg)?;
        if let Some(url) = &cfg.health_url {
            source.probe(url).await?;
        }
        Ok(source)
    }

    async fn probe(&self, url: &str) -> Result<(), ImageSourceError> {
        let resp = self.client.get(url).send().await.map_err(|e| {
            ImageSourceError::unavailable(format!("health probe '{url}' failed: {e}"))
        })?;
        if !resp.status().is_success() {
            return Err(ImageSourceError::unavailable(format!(
                "health probe '{url}' returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    fn describe(&self) -> String {
        format!("{} via {}", self.model, self.endpoint)
    }

    async fn synthesize(&self, prompt: &str) -> Result<RasterImage, ImageSourceError> {
        let body = SynthesisRequest {
            model: &self.model,
            prompt,
            num_inference_steps: self.num_inference_steps,
            guidance_scale: self.guidance_scale,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ImageSourceError::unavailable(format!(
                        "inference server '{}' unreachable: {e}",
                        self.endpoint
                    ))
                } else {
                    ImageSourceError::generation(format!("inference request failed: {e}"))
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(ImageSourceError::generation(format!(
                "inference server returned {status}: {}",
                detail.trim()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ImageSourceError::generation(format!("read inference response: {e}")))?;

        decode_image(&bytes).map_err(|e| ImageSourceError::generation(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/http.rs"]
mod tests;
