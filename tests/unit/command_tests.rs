//! Unit tests for mention command parsing.

use tracker_intercom::models::command::{Command, VALID_COMMANDS};

#[test]
fn parses_every_vocabulary_token() {
    assert_eq!(Command::parse("<@U123> start"), Command::Start);
    assert_eq!(Command::parse("<@U123> done"), Command::Done);
    assert_eq!(Command::parse("<@U123> cancel"), Command::Cancel);
    assert_eq!(Command::parse("<@U123> restart"), Command::Restart);
    assert_eq!(Command::parse("<@U123> create"), Command::Create);
}

#[test]
fn parsing_is_case_insensitive() {
    assert_eq!(Command::parse("<@U123> DONE"), Command::Done);
    assert_eq!(Command::parse("<@U123> Start"), Command::Start);
}

#[test]
fn strips_mention_markup_and_whitespace() {
    assert_eq!(Command::parse("<@U0XYZ>    done   "), Command::Done);
}

#[test]
fn text_without_mention_markup_still_parses() {
    assert_eq!(Command::parse("done"), Command::Done);
}

#[test]
fn unknown_token_preserves_original_casing() {
    let parsed = Command::parse("<@U123> Deploy");
    assert_eq!(parsed, Command::Invalid("Deploy".into()));
}

#[test]
fn empty_mention_is_invalid() {
    assert_eq!(Command::parse("<@U123>"), Command::Invalid(String::new()));
}

#[test]
fn multi_word_text_is_invalid_verbatim() {
    let parsed = Command::parse("<@U123> please close this");
    assert_eq!(parsed, Command::Invalid("please close this".into()));
}

#[test]
fn target_states_match_lifecycle_names() {
    assert_eq!(Command::Start.target_state(), Some("In Progress"));
    assert_eq!(Command::Done.target_state(), Some("Done"));
    assert_eq!(Command::Cancel.target_state(), Some("Canceled"));
    assert_eq!(Command::Restart.target_state(), Some("To Do"));
}

#[test]
fn create_and_invalid_have_no_target_state() {
    assert_eq!(Command::Create.target_state(), None);
    assert_eq!(Command::Invalid("x".into()).target_state(), None);
}

#[test]
fn vocabulary_list_matches_parseable_tokens() {
    for token in VALID_COMMANDS {
        assert_ne!(
            Command::parse(token),
            Command::Invalid(token.to_owned()),
            "{token} must parse as a command"
        );
    }
}
