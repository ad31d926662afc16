//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

/// Keyring service name used for credential lookups.
const KEYRING_SERVICE: &str = "tracker-intercom";

/// Nested Slack configuration for Socket Mode connectivity.
///
/// Tokens are loaded at runtime via OS keychain or environment variables,
/// not from the TOML config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// App-level token used for Socket Mode (populated at runtime).
    #[serde(skip)]
    pub app_token: String,
    /// Bot user token used for Web API calls (populated at runtime).
    #[serde(skip)]
    pub bot_token: String,
}

/// Issue tracker connection and project settings.
///
/// The API token is loaded at runtime via OS keychain or environment
/// variables, not from the TOML config file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TrackerConfig {
    /// Base URL of the tracker instance, e.g. `https://acme.atlassian.net`.
    pub server_url: String,
    /// Account used for basic-auth API calls.
    pub username: String,
    /// Project key under which new tickets are created.
    pub project_key: String,
    /// Optional parent ticket; when set, new tickets are created as children.
    pub parent_key: Option<String>,
    /// API token for basic auth (populated at runtime).
    #[serde(skip)]
    pub api_token: String,
}

/// Optional summarizer service settings.
///
/// Absence of this table disables the summarization call path entirely.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SummarizerConfig {
    /// OpenAI-compatible API base, e.g. `https://api.openai.com/v1`.
    pub endpoint: String,
    /// Model identifier passed on each request.
    pub model: String,
    /// API key (populated at runtime).
    #[serde(skip)]
    pub api_key: String,
}

fn default_http_port() -> u16 {
    3000
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Channel names watched for ticket-creating root messages.
    pub include_channels: Vec<String>,
    /// Requester emails allowed to issue mention commands.
    pub include_users: Vec<String>,
    /// HTTP port for the health endpoint.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Slack connectivity settings.
    #[serde(default)]
    pub slack: SlackConfig,
    /// Issue tracker settings.
    pub tracker: TrackerConfig,
    /// Optional summarizer settings.
    pub summarizer: Option<SummarizerConfig>,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load secrets from OS keychain with env-var fallback.
    ///
    /// Tries the `tracker-intercom` keyring service first, then falls back
    /// to `SLACK_APP_TOKEN` / `SLACK_BOT_TOKEN` / `TRACKER_API_TOKEN`
    /// (and `SUMMARIZER_API_KEY` when a summarizer is configured).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars provide
    /// a required credential.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.app_token = load_credential("slack_app_token", "SLACK_APP_TOKEN").await?;
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN").await?;
        self.tracker.api_token = load_credential("tracker_api_token", "TRACKER_API_TOKEN").await?;
        if let Some(ref mut summarizer) = self.summarizer {
            summarizer.api_key =
                load_credential("summarizer_api_key", "SUMMARIZER_API_KEY").await?;
        }
        Ok(())
    }

    /// Whether a channel name is on the creation watch list.
    #[must_use]
    pub fn is_included_channel(&self, channel_name: &str) -> bool {
        self.include_channels.iter().any(|c| c == channel_name)
    }

    /// Whether a requester email is allowed to issue mention commands.
    #[must_use]
    pub fn is_included_user(&self, email: &str) -> bool {
        self.include_users.iter().any(|u| u == email)
    }

    fn validate(&mut self) -> Result<()> {
        if self.include_channels.is_empty() {
            return Err(AppError::Config("include_channels must not be empty".into()));
        }

        if self.include_users.is_empty() {
            return Err(AppError::Config("include_users must not be empty".into()));
        }

        if self.tracker.server_url.trim().is_empty() {
            return Err(AppError::Config("tracker.server_url is required".into()));
        }

        if self.tracker.username.trim().is_empty() {
            return Err(AppError::Config("tracker.username is required".into()));
        }

        if self.tracker.project_key.trim().is_empty() {
            return Err(AppError::Config("tracker.project_key is required".into()));
        }

        // Normalize so URL joins in the tracker client stay predictable.
        while self.tracker.server_url.ends_with('/') {
            self.tracker.server_url.pop();
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // Try OS keychain first via spawn_blocking (keyring is synchronous I/O).
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    // Fallback to environment variable.
    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
