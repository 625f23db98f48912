use std::sync::Arc;

use calmai_auth::Session;
use calmai_auth::provider::IdentityProvider;
use calmai_client::{CalmApi, HttpApi, OfflineApi};

use crate::cli::Command;

/// Where requests go: the CalmAI API or the built-in demo data.
pub enum Backend {
    Http(HttpApi),
    Offline,
}

impl Backend {
    /// Identity endpoints used by the session before anyone is signed in.
    pub fn identity(&self) -> Arc<dyn IdentityProvider> {
        match self {
            Backend::Http(api) => Arc::new(api.clone()),
            Backend::Offline => Arc::new(OfflineApi::therapist()),
        }
    }

    /// Refuse commands whose effect the backend cannot keep. The demo data
    /// is rebuilt on every run, so an account created offline would be gone
    /// by the next command.
    pub fn supports(&self, command: &Command) -> eyre::Result<()> {
        match (self, command) {
            (Backend::Offline, Command::Signup { .. }) => Err(eyre::eyre!(
                "signup needs the CalmAI API; offline mode only knows the demo accounts"
            )),
            _ => Ok(()),
        }
    }

    /// Data access as the session's user.
    pub fn api_for(&self, session: &Session) -> eyre::Result<Box<dyn CalmApi>> {
        let user = session
            .user()
            .ok_or_else(|| eyre::eyre!("not signed in"))?;
        match self {
            Backend::Http(api) => {
                let token = session
                    .token()
                    .ok_or_else(|| eyre::eyre!("session has no token"))?;
                Ok(Box::new(api.with_token(token)))
            }
            Backend::Offline => Ok(Box::new(OfflineApi::new(user.clone()))),
        }
    }
}
