pub type CardResult<T> = Result<T, CardError>;

#[derive(thiserror::Error, Debug)]
pub enum CardError {
    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    pub fn invalid_position(msg: impl Into<String>) -> Self {
        Self::InvalidPosition(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
