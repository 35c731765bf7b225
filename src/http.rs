pub(crate) mod dto;
pub(crate) mod error;
pub(crate) mod handlers;
pub(crate) mod router;

use std::{sync::Arc, time::Duration};

use crate::service::VideoGenerator;

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<VideoGenerator>,
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(generator: Arc<VideoGenerator>) -> Self {
        Self {
            generator,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }
}
