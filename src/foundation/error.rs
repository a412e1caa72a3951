pub type GolResult<T> = Result<T, GolError>;

#[derive(thiserror::Error, Debug)]
pub enum GolError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("frame index {index} out of range for {frames} frame(s)")]
    BadIndex { index: usize, frames: usize },

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("image source error: {0}")]
    Source(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("cycle error: {0}")]
    Cycle(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GolError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn cycle(msg: impl Into<String>) -> Self {
        Self::Cycle(msg.into())
    }
}
