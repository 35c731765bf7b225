use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error, warn};

use crate::{http::dto::ErrorBody, service::GenerateError, source::ImageSourceError};

pub const EMPTY_PROMPT: &str = "Prompt cannot be empty";
pub const MODEL_UNAVAILABLE: &str = "AI model is not available or failed to load.";
pub const INTERNAL_ERROR: &str = "An internal error occurred.";

/// HTTP rendering of a failed request. Server-side detail is logged, never returned.
#[derive(Debug)]
pub enum HttpError {
    Generate(GenerateError),
    InvalidBody(String),
    TimedOut,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            HttpError::Generate(GenerateError::EmptyPrompt) => {
                debug!("rejected empty prompt");
                (StatusCode::BAD_REQUEST, EMPTY_PROMPT.to_string())
            }
            HttpError::Generate(GenerateError::SourceUnavailable(reason)) => {
                warn!("image source unavailable: {reason}");
                (StatusCode::SERVICE_UNAVAILABLE, MODEL_UNAVAILABLE.to_string())
            }
            HttpError::Generate(GenerateError::ImageSource(ImageSourceError::Unavailable(
                reason,
            ))) => {
                warn!("image source became unavailable: {reason}");
                (StatusCode::SERVICE_UNAVAILABLE, MODEL_UNAVAILABLE.to_string())
            }
            HttpError::Generate(e @ GenerateError::ImageSource(_))
            | HttpError::Generate(e @ GenerateError::Animation(_)) => {
                error!("error during video generation: {e:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
            HttpError::InvalidBody(msg) => {
                debug!("rejected request body: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            HttpError::TimedOut => {
                error!("video generation timed out");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<GenerateError> for HttpError {
    fn from(e: GenerateError) -> Self {
        HttpError::Generate(e)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/http/error.rs"]
mod tests;
