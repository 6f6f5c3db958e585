pub type PosterResult<T> = Result<T, PosterError>;

/// Error type for the whole engine. Variants group by which surface the
/// failure belongs to, so callers can route them to the right banner.
#[derive(Debug, thiserror::Error)]
pub enum PosterError {
    /// The source image could not be decoded.
    #[error("image load: {0}")]
    ImageLoad(String),

    /// The generative backend failed or returned nothing usable.
    #[error("remote service: {0}")]
    Remote(String),

    /// History or settings storage failed. Callers generally log and move on.
    #[error("persistence: {0}")]
    Persistence(String),

    /// The request itself is wrong (no image loaded, empty prompt).
    #[error("input: {0}")]
    Input(String),

    /// Adjustment or parameter values out of range.
    #[error("validation: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    pub fn image_load(msg: impl Into<String>) -> Self {
        PosterError::ImageLoad(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        PosterError::Remote(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        PosterError::Persistence(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        PosterError::Input(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        PosterError::Validation(msg.into())
    }
}
