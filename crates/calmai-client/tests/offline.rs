use std::sync::Arc;

use calmai_auth::error::AuthError;
use calmai_auth::guard::{PATIENT_LANDING, THERAPIST_LANDING};
use calmai_auth::provider::SignupRequest;
use calmai_auth::token::{MemoryTokenStore, TokenStore};
use calmai_auth::{AuthState, Session};
use calmai_client::{CalmApi, ClientError, OfflineApi};
use calmai_core::models::Role;

fn patient_signup(invite_code: &str) -> SignupRequest {
    SignupRequest {
        email: "riley.quinn@calmai.example".to_string(),
        password: "long enough".to_string(),
        name: "Riley Quinn".to_string(),
        role: Role::Patient,
        invite_code: Some(invite_code.to_string()),
    }
}

#[tokio::test]
async fn fixture_accounts_log_in_to_their_landing() {
    let api = Arc::new(OfflineApi::therapist());
    let store = Arc::new(MemoryTokenStore::default());
    let mut session = Session::new(api.clone(), store.clone());

    let landing = session
        .login("emily.carter@calmai.example", "anything")
        .await
        .unwrap();
    assert_eq!(landing, THERAPIST_LANDING);
    assert_eq!(store.load().unwrap().as_deref(), Some("offline.t1"));

    let landing = session
        .login("alex.rivera@calmai.example", "anything")
        .await
        .unwrap();
    assert_eq!(landing, PATIENT_LANDING);
}

#[tokio::test]
async fn unknown_email_or_blank_password_is_rejected() {
    let api = Arc::new(OfflineApi::therapist());
    let mut session = Session::new(api, Arc::new(MemoryTokenStore::default()));

    let err = session.login("nobody@calmai.example", "pw").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    let err = session
        .login("emily.carter@calmai.example", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
    assert_eq!(session.state(), &AuthState::Anonymous);
}

#[tokio::test]
async fn stored_offline_token_restores_the_session() {
    let api = Arc::new(OfflineApi::therapist());
    let store = Arc::new(MemoryTokenStore::with_token("offline.p1"));
    let mut session = Session::new(api, store);

    let state = session.restore().await;
    assert_eq!(state.user().map(|u| u.role), Some(Role::Patient));
}

#[tokio::test]
async fn foreign_token_is_cleared_on_restore() {
    let api = Arc::new(OfflineApi::therapist());
    let store = Arc::new(MemoryTokenStore::with_token("issued-elsewhere"));
    let mut session = Session::new(api, store.clone());

    assert_eq!(session.restore().await, &AuthState::Anonymous);
    assert_eq!(store.load().unwrap(), None);
}

#[tokio::test]
async fn patient_signup_redeems_a_fresh_invite() {
    let api = Arc::new(OfflineApi::therapist());
    let invite = api.create_invite().await.unwrap();
    let mut session = Session::new(api.clone(), Arc::new(MemoryTokenStore::default()));

    let landing = session.signup(&patient_signup(&invite.code)).await.unwrap();
    assert_eq!(landing, PATIENT_LANDING);
    assert_eq!(api.user().name, "Riley Quinn");
    assert!(api.my_journals().await.unwrap().is_empty());

    // Single use.
    let err = session.signup(&patient_signup(&invite.code)).await.unwrap_err();
    assert!(matches!(err, AuthError::SignupRejected(_)));
}

#[tokio::test]
async fn used_invite_cannot_be_redeemed() {
    let api = Arc::new(OfflineApi::therapist());
    let mut session = Session::new(api, Arc::new(MemoryTokenStore::default()));

    let err = session.signup(&patient_signup("CALM-K9LD")).await.unwrap_err();
    assert!(matches!(err, AuthError::SignupRejected(_)));
    assert_eq!(session.state(), &AuthState::Anonymous);
}

#[tokio::test]
async fn therapists_only_see_their_own_caseload() {
    let api = OfflineApi::therapist();
    assert_eq!(api.patients().await.unwrap().len(), 5);

    let err = api.my_journals().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 403, .. }));
    let err = api.patient_journals("p404").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn deleted_account_is_signed_out() {
    let api = OfflineApi::patient();
    api.delete_account().await.unwrap();

    let err = api.my_journals().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
}

#[tokio::test]
async fn outage_surfaces_as_connection_error() {
    let api = OfflineApi::patient().unreachable();
    let err = api.conversations().await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)));
}
