//! Unit tests for the thread archive rendering.

use tracker_intercom::bridge::effects::{concat_bodies, render_archive};
use tracker_intercom::models::message::ThreadMessage;

fn sample() -> Vec<ThreadMessage> {
    vec![
        ThreadMessage {
            user: Some("U100".into()),
            bot_id: None,
            text: "VPN is down".into(),
            ts: "1700000000.000100".into(),
        },
        ThreadMessage {
            user: None,
            bot_id: Some("B001".into()),
            text: "Ticket created: <https://t.example/browse/SUP-1|SUP-1>".into(),
            ts: "1700000001.000200".into(),
        },
        ThreadMessage {
            user: None,
            bot_id: None,
            text: "orphan line".into(),
            ts: "1700000002.000300".into(),
        },
    ]
}

#[test]
fn archive_has_one_line_per_message_with_author_and_ts() {
    let archive = render_archive(&sample());
    let lines: Vec<_> = archive.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "[1700000000.000100] U100: VPN is down");
    assert!(lines[1].starts_with("[1700000001.000200] B001: "));
    assert_eq!(lines[2], "[1700000002.000300] unknown: orphan line");
}

#[test]
fn concat_keeps_only_bodies_in_order() {
    let bodies = concat_bodies(&sample());
    let lines: Vec<_> = bodies.lines().collect();

    assert_eq!(lines.first(), Some(&"VPN is down"));
    assert_eq!(lines.last(), Some(&"orphan line"));
    assert!(!bodies.contains("1700000000"));
}

#[test]
fn empty_thread_renders_empty() {
    assert!(render_archive(&[]).is_empty());
    assert!(concat_bodies(&[]).is_empty());
}
