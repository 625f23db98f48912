use std::future::Future;
use std::pin::Pin;

use calmai_core::models::{Role, User};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    /// Required for patients; links the account to the inviting therapist.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub invite_code: Option<String>,
}

/// A successful login or signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthGrant {
    pub access_token: String,
    pub user: User,
}

/// The backend's identity endpoints.
///
/// Methods return boxed futures for dyn compatibility.
pub trait IdentityProvider: Send + Sync {
    /// Resolve the user a token belongs to.
    fn current_user<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<User, AuthError>>;

    fn login<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>>;

    fn signup<'a>(
        &'a self,
        request: &'a SignupRequest,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>>;
}
