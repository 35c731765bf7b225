use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::encode::artifact::EncodedVideo;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoResponse {
    pub video_base64: String,
    pub status: String,
}

impl From<&EncodedVideo> for VideoResponse {
    fn from(video: &EncodedVideo) -> Self {
        Self {
            video_base64: base64::engine::general_purpose::STANDARD.encode(&video.bytes),
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}
