/// Result alias used across the crate's fallible boundaries.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised at the crate boundary.
///
/// The pixel operations themselves never fail; errors only come from constructing surfaces over
/// caller buffers, parsing configuration, and image decode/encode.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// Invalid geometry, parameter values, or names.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration that could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Image decode/encode failure.
    #[error("image error: {0}")]
    Image(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FilterError {
    /// Build a [`FilterError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FilterError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`FilterError::Image`].
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
