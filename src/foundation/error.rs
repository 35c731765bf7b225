/// Result alias used across the crate.
pub type StillResult<T> = Result<T, StillError>;

/// Crate-wide error for animation and encoding.
#[derive(thiserror::Error, Debug)]
pub enum StillError {
    /// Input rejected before any frame was produced (zero dimensions, bad spec, bad index).
    #[error("validation error: {0}")]
    Validation(String),

    /// The output video stream could not be opened, written, or finalized.
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StillError {
    /// Build a [`StillError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StillError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Whether this is a [`StillError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this is a [`StillError::Encoding`].
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
