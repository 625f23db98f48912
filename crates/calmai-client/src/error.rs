use calmai_auth::error::AuthError;
use calmai_core::error::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot reach the CalmAI API at {0}")]
    Connection(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("not authenticated")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ClientError> for AuthError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Unauthorized => AuthError::Unauthorized,
            ClientError::Serialization(e) => AuthError::Serialization(e),
            other => AuthError::Provider(other.to_string()),
        }
    }
}
