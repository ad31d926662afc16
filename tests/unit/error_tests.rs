//! Unit tests for `AppError` display format.

use tracker_intercom::AppError;

#[test]
fn tracker_error_display_starts_with_tracker_prefix() {
    let err = AppError::Tracker("get transitions returned 502".into());
    assert!(err.to_string().starts_with("tracker:"));
}

#[test]
fn slack_error_is_distinct_from_tracker_error() {
    let slack = AppError::Slack("request failed".into());
    let tracker = AppError::Tracker("request failed".into());
    assert_ne!(slack.to_string(), tracker.to_string());
}

#[test]
fn error_messages_have_no_trailing_period() {
    let err = AppError::NotFound("no ticket in thread".into());
    let s = err.to_string();
    assert!(
        !s.ends_with('.'),
        "error message must not end with a period: {s}"
    );
}

#[test]
fn implements_std_error_trait() {
    fn assert_error<E: std::error::Error>(_err: &E) {}
    assert_error(&AppError::Summarizer("service returned 500".into()));
}

#[test]
fn toml_parse_failures_become_config_errors() {
    let err = tracker_intercom::GlobalConfig::from_toml_str("include_channels = 3")
        .expect_err("must fail");
    assert!(err.to_string().starts_with("config:"));
}
