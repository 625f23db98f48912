//! calmai-auth
//!
//! Session gate: the authentication state machine, the route guard and
//! local storage of the access token.

pub mod claims;
pub mod error;
pub mod guard;
pub mod provider;
pub mod session;
pub mod token;

pub use guard::{RouteDecision, guard, landing_route};
pub use session::{AuthState, Session};
