//! Error types shared across the application.
//!
//! Expected negative outcomes (an unrecognized command, a transition that is
//! not currently available, an ambiguous assignee lookup) are not errors.
//! They are modeled as variants on the relevant outcome types so that
//! "absent" is never conflated with "transport failed".

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Slack API or Socket Mode failure.
    Slack(String),
    /// Issue tracker API call failure.
    Tracker(String),
    /// Requested entity does not exist.
    NotFound(String),
    /// Summarizer service call failure.
    Summarizer(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Slack(msg) => write!(f, "slack: {msg}"),
            Self::Tracker(msg) => write!(f, "tracker: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::Summarizer(msg) => write!(f, "summarizer: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
