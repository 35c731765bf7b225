use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use super::*;
use crate::{
    config::{Config, SourceKind},
    raster::buffer::PixelLayout,
};

#[derive(Default)]
struct SlowSource {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: AtomicUsize,
}

#[async_trait]
impl ImageSource for SlowSource {
    fn describe(&self) -> String {
        "slow".to_string()
    }

    async fn synthesize(&self, _prompt: &str) -> Result<RasterImage, ImageSourceError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        RasterImage::solid(4, 4, PixelLayout::Rgb8, &[1, 2, 3])
            .map_err(|e| ImageSourceError::generation(e.to_string()))
    }
}

#[tokio::test]
async fn synthesize_calls_are_serialized() {
    let source = Arc::new(SlowSource::default());
    let handle = Arc::new(ImageSourceHandle::ready(source.clone()));

    let mut tasks = Vec::new();
    for i in 0..4 {
        let handle = Arc::clone(&handle);
        tasks.push(tokio::spawn(async move {
            handle.synthesize(&format!("prompt {i}")).await
        }));
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }

    assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unavailable_handle_reports_reason() {
    let handle = ImageSourceHandle::unavailable("weights missing");
    assert!(!handle.is_available());
    assert_eq!(handle.unavailable_reason(), Some("weights missing"));
    let err = handle.synthesize("x").await.unwrap_err();
    assert_eq!(err, ImageSourceError::unavailable("weights missing"));
}

#[tokio::test]
async fn failed_load_yields_unavailable_handle() {
    let mut cfg = Config::default().image_source;
    cfg.kind = SourceKind::File;
    cfg.path = Some("target/definitely/missing/still.png".into());
    let handle = ImageSourceHandle::load(&cfg).await;
    assert!(!handle.is_available());
    assert!(handle.unavailable_reason().unwrap().contains("missing"));
    handle.shutdown();
}

#[tokio::test]
async fn file_source_loads_and_serves_the_still() {
    let path = std::path::PathBuf::from("target").join("unit_source_handle").join("still.png");
    let still = RasterImage::solid(6, 6, PixelLayout::Rgb8, &[9, 9, 9]).unwrap();
    crate::raster::decode::save_png(&still, &path).unwrap();

    let mut cfg = Config::default().image_source;
    cfg.kind = SourceKind::File;
    cfg.path = Some(path.clone());
    let handle = ImageSourceHandle::load(&cfg).await;
    assert!(handle.is_available());
    assert_eq!(handle.synthesize("anything").await.unwrap(), still);
    handle.shutdown();
    let _ = std::fs::remove_file(path);
}
