use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::*;
use crate::{
    foundation::{
        core::{Canvas, Fps},
        error::StillResult,
    },
    raster::buffer::{PixelLayout, RasterImage},
    source::ImageSource,
};

#[derive(Default)]
struct CountingSource {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl ImageSource for CountingSource {
    fn describe(&self) -> String {
        "counting".to_string()
    }

    async fn synthesize(&self, _prompt: &str) -> Result<RasterImage, ImageSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ImageSourceError::generation("NaN latents"));
        }
        RasterImage::solid(8, 6, PixelLayout::Rgb8, &[5, 5, 5])
            .map_err(|e| ImageSourceError::generation(e.to_string()))
    }
}

#[derive(Default)]
struct CountingRenderer {
    calls: AtomicUsize,
    fail: bool,
}

impl VideoRenderer for CountingRenderer {
    fn render(&self, base: &RasterImage, spec: &AnimationSpec) -> StillResult<EncodedVideo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(StillError::encoding("libx264 not available"));
        }
        Ok(EncodedVideo {
            bytes: b"mp4".to_vec(),
            frame_count: spec.frame_count(),
            fps: spec.fps(),
            canvas: base.canvas(),
        })
    }
}

fn generator(
    source: Arc<CountingSource>,
    renderer: Arc<CountingRenderer>,
) -> VideoGenerator {
    VideoGenerator::new(
        Arc::new(ImageSourceHandle::ready(source)),
        renderer,
        AnimationSpec::default(),
    )
}

#[tokio::test]
async fn happy_path_runs_both_phases() {
    let source = Arc::new(CountingSource::default());
    let renderer = Arc::new(CountingRenderer::default());
    let video = generator(source.clone(), renderer.clone())
        .generate("  a red fox  ")
        .await
        .unwrap();

    assert_eq!(video.frame_count, 120);
    assert_eq!(video.fps, Fps::new(24).unwrap());
    assert_eq!(video.canvas, Canvas::new(8, 6).unwrap());
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_prompt_never_reaches_the_source() {
    let source = Arc::new(CountingSource::default());
    let renderer = Arc::new(CountingRenderer::default());
    let generator = generator(source.clone(), renderer.clone());

    for prompt in ["", "   ", "\n\t"] {
        let err = generator.generate(prompt).await.unwrap_err();
        assert!(matches!(err, GenerateError::EmptyPrompt));
    }
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unavailable_source_never_reaches_the_renderer() {
    let renderer = Arc::new(CountingRenderer::default());
    let generator = VideoGenerator::new(
        Arc::new(ImageSourceHandle::unavailable("load failed")),
        renderer.clone(),
        AnimationSpec::default(),
    );

    let err = generator.generate("a castle").await.unwrap_err();
    assert!(matches!(err, GenerateError::SourceUnavailable(ref r) if r == "load failed"));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn synthesis_failure_is_tagged_as_image_source() {
    let source = Arc::new(CountingSource {
        fail: true,
        ..Default::default()
    });
    let renderer = Arc::new(CountingRenderer::default());
    let err = generator(source, renderer.clone())
        .generate("a castle")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GenerateError::ImageSource(ImageSourceError::Generation(_))
    ));
    assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn encoding_failure_is_tagged_as_animation() {
    let source = Arc::new(CountingSource::default());
    let renderer = Arc::new(CountingRenderer {
        fail: true,
        ..Default::default()
    });
    let err = generator(source, renderer)
        .generate("a castle")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Animation(ref e) if e.is_encoding()));
}
