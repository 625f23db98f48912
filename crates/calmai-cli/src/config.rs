use std::path::{Path, PathBuf};

use calmai_client::ClientConfig;
use calmai_client::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};

/// Layout of `config.json` written by this build. Files from older builds
/// are upgraded in [`migrate`] when loaded.
const CURRENT_VERSION: u32 = 1;

const CONFIG_FILE: &str = "config.json";
const TOKEN_FILE: &str = "token";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Absent in files written before the request timeout was configurable.
    #[serde(default)]
    pub config_version: u32,
    pub api_url: String,
    /// Request timeout for the API client.
    pub timeout_secs: u64,
    /// Use the built-in demo data instead of the API.
    #[serde(default)]
    pub offline: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            offline: false,
        }
    }
}

impl CliConfig {
    /// Client settings, with `CALMAI_API_URL` / `CALMAI_TIMEOUT_SECS` taking
    /// precedence over the file.
    pub fn client_config<F>(&self, env: F) -> eyre::Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ClientConfig::from_lookup(|key| {
            env(key).or_else(|| match key {
                "CALMAI_API_URL" => Some(self.api_url.clone()),
                "CALMAI_TIMEOUT_SECS" => Some(self.timeout_secs.to_string()),
                _ => None,
            })
        })?;
        Ok(config)
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("calmai"))
}

pub fn token_path(dir: &Path) -> PathBuf {
    dir.join(TOKEN_FILE)
}

/// Load the config in `dir`, or the defaults when there is none yet.
pub fn load_config(dir: &Path) -> eyre::Result<CliConfig> {
    let path = dir.join(CONFIG_FILE);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CliConfig::default());
        }
        Err(e) => {
            return Err(eyre::eyre!("failed to read config at {}: {e}", path.display()));
        }
    };

    // Old files lack fields the struct requires, so upgrade the raw value first.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: CliConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Bring a config written by an older calmai up to [`CURRENT_VERSION`].
/// Files from a newer calmai are refused rather than rewritten.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "{CONFIG_FILE} was written by a newer calmai (layout {from_version}, \
             this build reads up to {CURRENT_VERSION})"
        ));
    }

    // 1: request timeout, defaulting to what the client used before it was set.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("timeout_secs")
            .or_insert(serde_json::Value::Number(DEFAULT_TIMEOUT_SECS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!(timeout_secs = DEFAULT_TIMEOUT_SECS, "config upgraded to layout 1");
    }

    Ok(json)
}

pub fn save_config(dir: &Path, config: &CliConfig) -> eyre::Result<()> {
    std::fs::create_dir_all(dir)?;

    let current = CliConfig {
        config_version: CURRENT_VERSION,
        ..config.clone()
    };
    let path = dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(&current)?;

    // Rename over the old file so a crash never leaves half a config.
    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
