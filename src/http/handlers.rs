use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::http::{
    AppState,
    dto::{StatusMessage, VideoRequest, VideoResponse},
    error::HttpError,
};

pub const STATUS_MESSAGE: &str = "AI Video Generator API is running.";

pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: STATUS_MESSAGE.to_string(),
    })
}

pub async fn generate_video(
    State(state): State<AppState>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> Result<Json<VideoResponse>, HttpError> {
    let Json(request) = payload.map_err(|e| HttpError::InvalidBody(e.body_text()))?;

    let generation = state.generator.generate(&request.prompt);
    let video = match state.request_timeout {
        Some(limit) => tokio::time::timeout(limit, generation)
            .await
            .map_err(|_| HttpError::TimedOut)??,
        None => generation.await?,
    };

    Ok(Json(VideoResponse::from(&video)))
}
