use calmai_auth::guard::{LOGIN_ROUTE, PATIENT_LANDING, THERAPIST_LANDING, is_public};
use calmai_auth::{AuthState, RouteDecision, guard, landing_route};
use calmai_core::fixtures;
use calmai_core::models::Role;

#[test]
fn landing_routes_differ_by_role() {
    assert_eq!(landing_route(Role::Therapist), THERAPIST_LANDING);
    assert_eq!(landing_route(Role::Patient), PATIENT_LANDING);
    assert_ne!(THERAPIST_LANDING, PATIENT_LANDING);
}

#[test]
fn public_routes() {
    for path in [
        "/",
        "/login",
        "/signup",
        "/invite",
        "/invite/CALM-7Q2X",
        "/login/",
        "/login?next=/dashboard",
    ] {
        assert!(is_public(path), "{path}");
    }
    for path in ["/dashboard", "/journal", "/invites", "/loginx"] {
        assert!(!is_public(path), "{path}");
    }
}

#[test]
fn anonymous_is_sent_to_login() {
    let state = AuthState::Anonymous;
    assert_eq!(guard(&state, "/dashboard"), RouteDecision::Redirect(LOGIN_ROUTE));
    assert_eq!(guard(&state, "/journal/new"), RouteDecision::Redirect(LOGIN_ROUTE));
    assert_eq!(guard(&state, "/settings"), RouteDecision::Redirect(LOGIN_ROUTE));
    assert_eq!(guard(&state, "/signup"), RouteDecision::Allow);
}

#[test]
fn pending_states_wait_on_private_routes() {
    for state in [AuthState::Unknown, AuthState::Authenticating] {
        assert_eq!(guard(&state, "/patients"), RouteDecision::Wait);
        assert_eq!(guard(&state, "/"), RouteDecision::Allow);
    }
}

#[test]
fn therapist_routes() {
    let state = AuthState::Authenticated(fixtures::therapist_user());
    assert_eq!(guard(&state, "/dashboard"), RouteDecision::Allow);
    assert_eq!(guard(&state, "/patients/p1"), RouteDecision::Allow);
    assert_eq!(guard(&state, "/settings"), RouteDecision::Allow);
    assert_eq!(guard(&state, "/journal"), RouteDecision::Redirect(THERAPIST_LANDING));
    assert_eq!(guard(&state, "/login"), RouteDecision::Redirect(THERAPIST_LANDING));
}

#[test]
fn patient_routes() {
    let state = AuthState::Authenticated(fixtures::patient_user());
    assert_eq!(guard(&state, "/journal"), RouteDecision::Allow);
    assert_eq!(guard(&state, "/insights"), RouteDecision::Allow);
    assert_eq!(guard(&state, "/patients"), RouteDecision::Redirect(PATIENT_LANDING));
    assert_eq!(guard(&state, "/signup"), RouteDecision::Redirect(PATIENT_LANDING));
    // Prefix match is per path segment.
    assert_eq!(guard(&state, "/journaling-tips"), RouteDecision::Allow);
}
