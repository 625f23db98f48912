use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("mood must be between 1 and 5, got {0}")]
    InvalidMood(u8),

    #[error("journal entry content is empty")]
    EmptyContent,

    #[error("invalid date: {0}")]
    InvalidDate(String),
}
