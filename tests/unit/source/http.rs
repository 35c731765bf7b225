use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use super::*;
use crate::config::Config;

type Seen = Arc<Mutex<Vec<serde_json::Value>>>;

fn png_bytes() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        12,
        8,
        image::Rgb([40, 80, 120]),
    ));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

async fn generate(
    State(seen): State<Seen>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
    seen.lock().unwrap().push(body);
    if prompt == "explode" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "CUDA out of memory").into_response();
    }
    if prompt == "garbage" {
        return ([(header::CONTENT_TYPE, "image/png")], b"nope".to_vec()).into_response();
    }
    ([(header::CONTENT_TYPE, "image/png")], png_bytes()).into_response()
}

async fn spawn_mock() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/generate", post(generate))
        .route("/health", get(|| async { "ok" }))
        .route("/sick", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn cfg_for(base: &str) -> ImageSourceConfig {
    let mut cfg = Config::default().image_source;
    cfg.endpoint = format!("{base}/generate");
    cfg.timeout_secs = 5;
    cfg
}

#[tokio::test]
async fn synthesize_posts_request_and_decodes_image() {
    let (base, seen) = spawn_mock().await;
    let source = HttpImageSource::connect(&cfg_for(&base)).await.unwrap();

    let img = source.synthesize("a lighthouse at dusk").await.unwrap();
    assert_eq!((img.width(), img.height()), (12, 8));
    assert_eq!(img.pixel(0, 0), &[40, 80, 120]);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0]["prompt"], "a lighthouse at dusk");
    assert_eq!(seen[0]["model"], "stabilityai/sd-turbo");
    assert_eq!(seen[0]["num_inference_steps"], 2);
    assert_eq!(seen[0]["guidance_scale"], 0.0);
}

#[tokio::test]
async fn server_error_is_a_generation_failure() {
    let (base, _) = spawn_mock().await;
    let source = HttpImageSource::connect(&cfg_for(&base)).await.unwrap();
    let err = source.synthesize("explode").await.unwrap_err();
    assert!(matches!(err, ImageSourceError::Generation(ref m) if m.contains("500")));
}

#[tokio::test]
async fn undecodable_body_is_a_generation_failure() {
    let (base, _) = spawn_mock().await;
    let source = HttpImageSource::connect(&cfg_for(&base)).await.unwrap();
    let err = source.synthesize("garbage").await.unwrap_err();
    assert!(matches!(err, ImageSourceError::Generation(_)));
}

#[tokio::test]
async fn health_probe_gates_connect() {
    let (base, _) = spawn_mock().await;

    let mut cfg = cfg_for(&base);
    cfg.health_url = Some(format!("{base}/health"));
    assert!(HttpImageSource::connect(&cfg).await.is_ok());

    cfg.health_url = Some(format!("{base}/sick"));
    let err = HttpImageSource::connect(&cfg).await.unwrap_err();
    assert!(matches!(err, ImageSourceError::Unavailable(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut cfg = cfg_for(&format!("http://{addr}"));
    cfg.timeout_secs = 2;
    let source = HttpImageSource::new(&cfg).unwrap();
    let err = source.synthesize("anything").await.unwrap_err();
    assert!(matches!(err, ImageSourceError::Unavailable(_)));
}
