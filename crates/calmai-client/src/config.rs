/// Default backend location for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Read `CALMAI_API_URL` and `CALMAI_TIMEOUT_SECS`, falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, crate::error::ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, crate::error::ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("CALMAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(crate::error::ClientError::Config(format!(
                "CALMAI_API_URL must be an http(s) URL, got {base_url:?}"
            )));
        }

        let timeout_secs = match lookup("CALMAI_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    crate::error::ClientError::Config(format!(
                        "CALMAI_TIMEOUT_SECS must be a positive number of seconds, got {raw:?}"
                    ))
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }
}
