use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not authenticated")]
    Unauthorized,

    #[error("token expired")]
    TokenExpired,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("signup rejected: {0}")]
    SignupRejected(String),

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("token storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
