//! Unit tests for announcement parsing and key extraction.

use tracker_intercom::correlate::{announcement_text, find_ticket_key, ANNOUNCEMENT_PREFIX};
use tracker_intercom::models::message::ThreadMessage;
use tracker_intercom::models::ticket::TicketKey;

fn human(text: &str, ts: &str) -> ThreadMessage {
    ThreadMessage {
        user: Some("U100".into()),
        bot_id: None,
        text: text.into(),
        ts: ts.into(),
    }
}

fn bot(text: &str, ts: &str) -> ThreadMessage {
    ThreadMessage {
        user: None,
        bot_id: Some("B001".into()),
        text: text.into(),
        ts: ts.into(),
    }
}

#[test]
fn announcement_contains_bracket_pipe_link() {
    let text = announcement_text(&TicketKey("SUP-42".into()), "https://t.example/browse/SUP-42");
    assert!(text.starts_with(ANNOUNCEMENT_PREFIX));
    assert!(text.contains("<https://t.example/browse/SUP-42|SUP-42>"));
}

#[test]
fn written_announcement_is_recovered_by_extractor() {
    let text = announcement_text(&TicketKey("SUP-42".into()), "https://t.example/browse/SUP-42");
    let messages = vec![human("help please", "1.0"), bot(&text, "2.0")];

    assert_eq!(find_ticket_key(&messages), Some(TicketKey("SUP-42".into())));
}

#[test]
fn empty_history_yields_none() {
    assert_eq!(find_ticket_key(&[]), None);
}

#[test]
fn history_without_announcement_yields_none() {
    let messages = vec![
        human("anyone seen SUP-9 lately?", "1.0"),
        human("yes, it shipped", "2.0"),
    ];

    assert_eq!(find_ticket_key(&messages), None);
}

#[test]
fn bare_key_text_is_not_an_announcement() {
    // A key-shaped string outside the announcement pattern must not
    // correlate the thread.
    let messages = vec![bot("SUP-1 looks related", "1.0")];
    assert_eq!(find_ticket_key(&messages), None);
}

#[test]
fn recreated_ticket_shadows_the_stale_key() {
    let first = announcement_text(&TicketKey("SUP-1".into()), "https://t.example/browse/SUP-1");
    let second = announcement_text(&TicketKey("SUP-2".into()), "https://t.example/browse/SUP-2");
    let messages = vec![
        human("root", "1.0"),
        bot(&first, "2.0"),
        human("<@UBOT> create", "3.0"),
        bot(&second, "4.0"),
    ];

    assert_eq!(find_ticket_key(&messages), Some(TicketKey("SUP-2".into())));
}
