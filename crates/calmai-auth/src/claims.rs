use jsonwebtoken::dangerous::insecure_decode;
use serde::Deserialize;

use crate::error::AuthError;

/// Claims read from the payload of a JWT access token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenClaims {
    pub fn is_expired(&self, now: jiff::Timestamp) -> bool {
        self.exp.is_some_and(|exp| exp <= now.as_second())
    }
}

/// Decode the claims of a JWT without checking its signature.
///
/// The claims may be used to reject a token early, never to accept one.
pub fn peek_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let data = insecure_decode::<TokenClaims>(token)?;
    Ok(data.claims)
}

/// Peek at a token and fail with [`AuthError::TokenExpired`] when its `exp`
/// claim has passed. Tokens that are not JWTs come back as decode errors.
pub fn check_expiry(token: &str, now: jiff::Timestamp) -> Result<TokenClaims, AuthError> {
    let claims = peek_claims(token)?;
    if claims.is_expired(now) {
        return Err(AuthError::TokenExpired);
    }
    Ok(claims)
}
