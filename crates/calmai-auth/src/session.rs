use std::sync::Arc;

use calmai_core::models::User;
use tracing::{debug, info, warn};

use crate::claims::check_expiry;
use crate::error::AuthError;
use crate::guard::{self, RouteDecision};
use crate::provider::{Credentials, IdentityProvider, SignupRequest};
use crate::token::TokenStore;

/// Where the session stands.
///
/// `Unknown` moves to `Anonymous` when no token is stored, otherwise to
/// `Authenticating` and then `Authenticated` or `Anonymous` depending on
/// the backend's answer. Login and signup lead to `Authenticated`, logout
/// back to `Anonymous`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    /// Token storage not consulted yet.
    #[default]
    Unknown,
    /// A stored token is being verified with the backend.
    Authenticating,
    Authenticated(User),
    Anonymous,
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// The session of one client, constructed at startup and passed to
/// whatever needs to know who is signed in.
pub struct Session {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn TokenStore>,
    state: AuthState,
    token: Option<String>,
}

impl Session {
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            provider,
            store,
            state: AuthState::Unknown,
            token: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user()
    }

    /// Bearer token for API calls, present only while authenticated.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn guard(&self, path: &str) -> RouteDecision {
        guard::guard(&self.state, path)
    }

    pub async fn restore(&mut self) -> &AuthState {
        self.restore_at(jiff::Timestamp::now()).await
    }

    /// Resolve the stored token into a user.
    ///
    /// Fails closed: a missing, expired or rejected token, a storage error
    /// and a network error all end in `Anonymous`.
    pub async fn restore_at(&mut self, now: jiff::Timestamp) -> &AuthState {
        let stored = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "failed to read stored token");
                None
            }
        };

        let Some(token) = stored else {
            debug!("no stored token");
            self.state = AuthState::Anonymous;
            return &self.state;
        };

        // Opaque tokens still go to the backend; only a readable, expired
        // exp claim short-circuits.
        if let Err(e @ AuthError::TokenExpired) = check_expiry(&token, now) {
            info!(reason = %e, "stored token dropped");
            self.drop_token();
            return &self.state;
        }

        self.state = AuthState::Authenticating;
        match self.provider.current_user(&token).await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "session restored");
                self.token = Some(token);
                self.state = AuthState::Authenticated(user);
            }
            Err(e) => {
                info!(error = %e, "stored token rejected");
                self.drop_token();
            }
        }
        &self.state
    }

    /// Log in and return the landing route for the user's role.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&'static str, AuthError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.provider.login(&credentials).await;
        self.accept_grant(result)
    }

    /// Create an account and return the landing route for its role.
    pub async fn signup(&mut self, request: &SignupRequest) -> Result<&'static str, AuthError> {
        let result = self.provider.signup(request).await;
        self.accept_grant(result)
    }

    /// Forget the token locally. There is no server-side revocation.
    pub fn logout(&mut self) {
        if let Some(user) = self.user() {
            info!(user_id = %user.id, "logged out");
        }
        self.drop_token();
    }

    fn accept_grant(
        &mut self,
        result: Result<crate::provider::AuthGrant, AuthError>,
    ) -> Result<&'static str, AuthError> {
        let grant = match result {
            Ok(grant) => grant,
            Err(e) => {
                if !self.state.is_authenticated() {
                    self.state = AuthState::Anonymous;
                }
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&grant.access_token) {
            warn!(error = %e, "failed to persist token; session lasts until exit");
        }

        let landing = guard::landing_route(grant.user.role);
        info!(user_id = %grant.user.id, role = %grant.user.role, landing, "authenticated");
        self.token = Some(grant.access_token);
        self.state = AuthState::Authenticated(grant.user);
        Ok(landing)
    }

    fn drop_token(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored token");
        }
        self.token = None;
        self.state = AuthState::Anonymous;
    }
}
