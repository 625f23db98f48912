use calmai_cli::config::{CliConfig, load_config, save_config, token_path};
use calmai_client::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(dir.path()).unwrap();
    assert_eq!(config, CliConfig::default());
    assert_eq!(config.api_url, DEFAULT_API_URL);
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let config = CliConfig {
        api_url: "https://api.calmai.example".to_string(),
        timeout_secs: 10,
        offline: true,
        ..Default::default()
    };
    save_config(dir.path(), &config).unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn saved_config_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    save_config(dir.path(), &CliConfig::default()).unwrap();
    let mode = std::fs::metadata(dir.path().join("config.json"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn unversioned_config_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "api_url": "https://legacy.calmai.example/api" }"#,
    )
    .unwrap();

    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.api_url, "https://legacy.calmai.example/api");
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert!(!config.offline);
}

#[test]
fn newer_config_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "config_version": 7, "api_url": "https://x", "timeout_secs": 1 }"#,
    )
    .unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().contains("written by a newer calmai"));
}

#[test]
fn environment_overrides_file_values() {
    let config = CliConfig {
        api_url: "https://file.calmai.example".to_string(),
        timeout_secs: 12,
        ..Default::default()
    };

    let from_file = config.client_config(|_| None).unwrap();
    assert_eq!(from_file.base_url, "https://file.calmai.example");
    assert_eq!(from_file.timeout_secs, 12);

    let from_env = config
        .client_config(|key| (key == "CALMAI_API_URL").then(|| "http://localhost:9000".to_string()))
        .unwrap();
    assert_eq!(from_env.base_url, "http://localhost:9000");
    assert_eq!(from_env.timeout_secs, 12);
}

#[test]
fn zero_timeout_is_not_usable() {
    let config = CliConfig {
        timeout_secs: 0,
        ..Default::default()
    };
    assert!(config.client_config(|_| None).is_err());

    let rescued = config
        .client_config(|key| (key == "CALMAI_TIMEOUT_SECS").then(|| "5".to_string()))
        .unwrap();
    assert_eq!(rescued.timeout_secs, 5);
}

#[test]
fn token_lives_next_to_config() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(token_path(dir.path()), dir.path().join("token"));
}
