//! Credential loading from env-var fallback.
//!
//! These tests mutate process-wide environment variables, so they are
//! serialized with `serial_test`.

use serial_test::serial;
use tracker_intercom::{config::GlobalConfig, AppError};

const ENV_KEYS: [&str; 4] = [
    "SLACK_APP_TOKEN",
    "SLACK_BOT_TOKEN",
    "TRACKER_API_TOKEN",
    "SUMMARIZER_API_KEY",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

fn minimal_toml() -> &'static str {
    r#"
include_channels = ["support"]
include_users = ["alice@example.com"]

[tracker]
server_url = "https://acme.atlassian.net"
username = "bot@example.com"
project_key = "SUP"
"#
}

#[tokio::test]
#[serial]
async fn env_vars_populate_secrets() {
    clear_env();
    std::env::set_var("SLACK_APP_TOKEN", "xapp-test");
    std::env::set_var("SLACK_BOT_TOKEN", "xoxb-test");
    std::env::set_var("TRACKER_API_TOKEN", "tracker-test");

    let mut config = GlobalConfig::from_toml_str(minimal_toml()).expect("config parses");
    config.load_credentials().await.expect("credentials load");

    assert_eq!(config.slack.app_token, "xapp-test");
    assert_eq!(config.slack.bot_token, "xoxb-test");
    assert_eq!(config.tracker.api_token, "tracker-test");

    clear_env();
}

#[tokio::test]
#[serial]
async fn missing_credentials_are_a_fatal_startup_error() {
    clear_env();

    let mut config = GlobalConfig::from_toml_str(minimal_toml()).expect("config parses");
    let err = config
        .load_credentials()
        .await
        .expect_err("must fail without credentials");

    assert!(matches!(err, AppError::Config(_)));

    clear_env();
}

#[tokio::test]
#[serial]
async fn summarizer_key_is_only_required_when_configured() {
    clear_env();
    std::env::set_var("SLACK_APP_TOKEN", "xapp-test");
    std::env::set_var("SLACK_BOT_TOKEN", "xoxb-test");
    std::env::set_var("TRACKER_API_TOKEN", "tracker-test");

    // No [summarizer] table: its credential must not be demanded.
    let mut config = GlobalConfig::from_toml_str(minimal_toml()).expect("config parses");
    config.load_credentials().await.expect("credentials load");
    assert!(config.summarizer.is_none());

    clear_env();
}

#[test]
#[serial]
fn config_loads_from_a_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, minimal_toml()).expect("write config");

    let config = GlobalConfig::load_from_path(&path).expect("config loads");
    assert_eq!(config.tracker.project_key, "SUP");
}
