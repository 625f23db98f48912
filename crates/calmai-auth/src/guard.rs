//! Route guard.
//!
//! A pure function of the auth state and the requested path, re-evaluated
//! whenever either changes.

use calmai_core::models::Role;

use crate::session::AuthState;

pub const LOGIN_ROUTE: &str = "/login";
pub const SIGNUP_ROUTE: &str = "/signup";
pub const THERAPIST_LANDING: &str = "/dashboard";
pub const PATIENT_LANDING: &str = "/journal";

/// Reachable without an account. `/invite/<code>` links are public too.
pub const PUBLIC_ROUTES: &[&str] = &["/", LOGIN_ROUTE, SIGNUP_ROUTE, "/invite"];

const THERAPIST_AREA: &[&str] = &[
    "/dashboard",
    "/patients",
    "/conversations",
    "/search",
    "/analytics",
    "/prompts",
    "/invites",
];

const PATIENT_AREA: &[&str] = &["/journal", "/insights", "/my-prompts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Auth state not resolved yet; render nothing.
    Wait,
    Redirect(&'static str),
}

pub fn landing_route(role: Role) -> &'static str {
    match role {
        Role::Therapist => THERAPIST_LANDING,
        Role::Patient => PATIENT_LANDING,
    }
}

pub fn is_public(path: &str) -> bool {
    let path = normalize(path);
    PUBLIC_ROUTES.iter().any(|r| *r == path) || in_area(path, &["/invite"])
}

pub fn guard(state: &AuthState, path: &str) -> RouteDecision {
    let path = normalize(path);
    match state {
        AuthState::Unknown | AuthState::Authenticating => {
            if is_public(path) {
                RouteDecision::Allow
            } else {
                RouteDecision::Wait
            }
        }
        AuthState::Anonymous => {
            if is_public(path) {
                RouteDecision::Allow
            } else {
                RouteDecision::Redirect(LOGIN_ROUTE)
            }
        }
        AuthState::Authenticated(user) => {
            let landing = landing_route(user.role);
            if path == LOGIN_ROUTE || path == SIGNUP_ROUTE {
                return RouteDecision::Redirect(landing);
            }
            let foreign_area = match user.role {
                Role::Therapist => PATIENT_AREA,
                Role::Patient => THERAPIST_AREA,
            };
            if in_area(path, foreign_area) {
                RouteDecision::Redirect(landing)
            } else {
                RouteDecision::Allow
            }
        }
    }
}

/// Drop query string, fragment and trailing slash.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn in_area(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
