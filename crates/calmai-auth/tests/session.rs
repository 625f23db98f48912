use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use calmai_auth::error::AuthError;
use calmai_auth::guard::{PATIENT_LANDING, THERAPIST_LANDING};
use calmai_auth::provider::{AuthGrant, BoxFuture, Credentials, IdentityProvider, SignupRequest};
use calmai_auth::token::{MemoryTokenStore, TokenStore};
use calmai_auth::{AuthState, RouteDecision, Session};
use calmai_core::fixtures;
use calmai_core::models::{Role, User};

#[derive(Default)]
struct StubProvider {
    verify_calls: AtomicUsize,
    reject_tokens: bool,
}

impl StubProvider {
    fn rejecting() -> Self {
        Self {
            reject_tokens: true,
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

impl IdentityProvider for StubProvider {
    fn current_user<'a>(&'a self, token: &'a str) -> BoxFuture<'a, Result<User, AuthError>> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if self.reject_tokens {
                return Err(AuthError::Provider("connection refused".to_string()));
            }
            match token {
                t if t.starts_with("patient") => Ok(fixtures::patient_user()),
                _ => Ok(fixtures::therapist_user()),
            }
        })
    }

    fn login<'a>(
        &'a self,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>> {
        Box::pin(async move {
            let user = [fixtures::therapist_user(), fixtures::patient_user()]
                .into_iter()
                .find(|u| u.email == credentials.email)
                .filter(|_| credentials.password == "correct horse")
                .ok_or(AuthError::InvalidCredentials)?;
            Ok(AuthGrant {
                access_token: format!("{}-token", user.role),
                user,
            })
        })
    }

    fn signup<'a>(
        &'a self,
        request: &'a SignupRequest,
    ) -> BoxFuture<'a, Result<AuthGrant, AuthError>> {
        Box::pin(async move {
            if request.role == Role::Patient && request.invite_code.is_none() {
                return Err(AuthError::SignupRejected("invite code required".to_string()));
            }
            Ok(AuthGrant {
                access_token: "new-token".to_string(),
                user: User {
                    id: "new".to_string(),
                    email: request.email.clone(),
                    name: request.name.clone(),
                    role: request.role,
                },
            })
        })
    }
}

fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"t1","exp":{exp}}}"#));
    format!("{header}.{payload}.c2ln")
}

fn session_with(
    provider: Arc<StubProvider>,
    store: Arc<MemoryTokenStore>,
) -> Session {
    Session::new(provider, store)
}

#[tokio::test]
async fn starts_unknown() {
    let session = session_with(Arc::default(), Arc::default());
    assert_eq!(session.state(), &AuthState::Unknown);
    assert_eq!(session.guard("/dashboard"), RouteDecision::Wait);
    assert_eq!(session.guard("/login"), RouteDecision::Allow);
}

#[tokio::test]
async fn no_token_resolves_anonymous_without_network() {
    let provider = Arc::new(StubProvider::default());
    let mut session = session_with(provider.clone(), Arc::default());

    assert_eq!(session.restore().await, &AuthState::Anonymous);
    assert_eq!(provider.calls(), 0);
    assert_eq!(session.guard("/dashboard"), RouteDecision::Redirect("/login"));
}

#[tokio::test]
async fn valid_token_restores_user() {
    let provider = Arc::new(StubProvider::default());
    let store = Arc::new(MemoryTokenStore::with_token("therapist-token"));
    let mut session = session_with(provider.clone(), store);

    let state = session.restore().await.clone();
    assert_eq!(state, AuthState::Authenticated(fixtures::therapist_user()));
    assert_eq!(provider.calls(), 1);
    assert_eq!(session.token(), Some("therapist-token"));
}

#[tokio::test]
async fn failed_verification_clears_token() {
    let provider = Arc::new(StubProvider::rejecting());
    let store = Arc::new(MemoryTokenStore::with_token("stale-token"));
    let mut session = session_with(provider.clone(), store.clone());

    assert_eq!(session.restore().await, &AuthState::Anonymous);
    assert_eq!(provider.calls(), 1);
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn expired_jwt_is_dropped_without_network() {
    let now: jiff::Timestamp = "2026-02-20T12:00:00Z".parse().unwrap();
    let provider = Arc::new(StubProvider::default());
    let store = Arc::new(MemoryTokenStore::with_token(jwt_with_exp(now.as_second() - 60)));
    let mut session = session_with(provider.clone(), store.clone());

    assert_eq!(session.restore_at(now).await, &AuthState::Anonymous);
    assert_eq!(provider.calls(), 0);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn unexpired_jwt_is_still_verified() {
    let now: jiff::Timestamp = "2026-02-20T12:00:00Z".parse().unwrap();
    let provider = Arc::new(StubProvider::default());
    let store = Arc::new(MemoryTokenStore::with_token(jwt_with_exp(now.as_second() + 3600)));
    let mut session = session_with(provider.clone(), store);

    assert!(session.restore_at(now).await.is_authenticated());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn therapist_login_lands_on_dashboard() {
    let store = Arc::new(MemoryTokenStore::default());
    let mut session = session_with(Arc::default(), store.clone());
    session.restore().await;

    let landing = session
        .login("emily.carter@calmai.example", "correct horse")
        .await
        .unwrap();
    assert_eq!(landing, THERAPIST_LANDING);
    assert_eq!(session.user().map(|u| u.role), Some(Role::Therapist));
    assert_eq!(store.load().unwrap().as_deref(), Some("therapist-token"));
}

#[tokio::test]
async fn patient_login_lands_on_journal() {
    let mut session = session_with(Arc::default(), Arc::default());
    session.restore().await;

    let landing = session
        .login("alex.rivera@calmai.example", "correct horse")
        .await
        .unwrap();
    assert_eq!(landing, PATIENT_LANDING);
    assert_eq!(session.guard("/dashboard"), RouteDecision::Redirect(PATIENT_LANDING));
}

#[tokio::test]
async fn bad_credentials_stay_anonymous() {
    let store = Arc::new(MemoryTokenStore::default());
    let mut session = session_with(Arc::default(), store.clone());
    session.restore().await;

    let err = session
        .login("emily.carter@calmai.example", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(session.state(), &AuthState::Anonymous);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn signup_authenticates() {
    let mut session = session_with(Arc::default(), Arc::default());
    let request = SignupRequest {
        email: "new@calmai.example".to_string(),
        password: "pw".to_string(),
        name: "New Patient".to_string(),
        role: Role::Patient,
        invite_code: Some("CALM-7Q2X".to_string()),
    };
    assert_eq!(session.signup(&request).await.unwrap(), PATIENT_LANDING);
    assert_eq!(session.token(), Some("new-token"));

    let rejected = SignupRequest {
        invite_code: None,
        ..request
    };
    let mut other = session_with(Arc::default(), Arc::default());
    assert!(matches!(
        other.signup(&rejected).await,
        Err(AuthError::SignupRejected(_))
    ));
    assert_eq!(other.state(), &AuthState::Anonymous);
}

#[tokio::test]
async fn logout_clears_everything() {
    let store = Arc::new(MemoryTokenStore::with_token("therapist-token"));
    let mut session = session_with(Arc::default(), store.clone());
    session.restore().await;
    assert!(session.state().is_authenticated());

    session.logout();
    assert_eq!(session.state(), &AuthState::Anonymous);
    assert_eq!(session.token(), None);
    assert_eq!(store.load().unwrap(), None);
    assert_eq!(session.guard("/patients/p1"), RouteDecision::Redirect("/login"));
}
