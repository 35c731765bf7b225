use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::http::{
    AppState,
    handlers::{generate_video, root},
};

/// Routes are mounted both bare and under `/api`, covering both deployment layouts.
pub fn create_router(state: AppState, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api", get(root))
        .route("/generate-video", post(generate_video))
        .route("/api/generate-video", post(generate_video))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(cors_origin))
        .with_state(state)
}

fn create_cors_layer(origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    match origin.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => base.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("invalid CORS origin in config, allowing any origin");
            base.allow_origin(Any)
        }
        None => base.allow_origin(Any),
    }
}
