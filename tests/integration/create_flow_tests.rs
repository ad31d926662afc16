//! Ticket creation flow against the mock seams.

use tracker_intercom::bridge::create::create_ticket;
use tracker_intercom::correlate::find_ticket_key;
use tracker_intercom::models::message::OriginMessage;
use tracker_intercom::models::ticket::TicketKey;

use super::test_helpers::{thread_ref, MockMessaging, MockTracker};

fn origin() -> OriginMessage {
    OriginMessage {
        channel: "C1".into(),
        ts: "1700000000.000100".into(),
        user_id: "U100".into(),
        text: "VPN is down".into(),
    }
}

#[tokio::test]
async fn root_message_creates_one_ticket_and_one_announcement() {
    let messaging = MockMessaging::default();
    let tracker = MockTracker::default();
    let thread = thread_ref();

    let key = create_ticket(&messaging, &tracker, &origin(), "support", &thread)
        .await
        .expect("ticket created");

    assert_eq!(key, TicketKey("SUP-1".into()));
    assert_eq!(tracker.created.lock().unwrap().len(), 1);

    let posted = messaging.posted_texts();
    assert_eq!(posted.len(), 1);
    assert!(
        posted[0].contains("<https://tracker.example/browse/SUP-1|SUP-1>"),
        "announcement must carry the bracket-pipe link: {}",
        posted[0]
    );
}

#[tokio::test]
async fn announcement_is_recoverable_from_history() {
    let messaging = MockMessaging::default();
    let tracker = MockTracker::default();
    let thread = thread_ref();

    let key = create_ticket(&messaging, &tracker, &origin(), "support", &thread)
        .await
        .expect("ticket created");

    let history = messaging.thread.lock().unwrap().clone();
    assert_eq!(find_ticket_key(&history), Some(key));
}

#[tokio::test]
async fn description_names_requester_permalink_and_raw_text() {
    let messaging = MockMessaging::default();
    let tracker = MockTracker::default();

    create_ticket(&messaging, &tracker, &origin(), "support", &thread_ref())
        .await
        .expect("ticket created");

    let created = tracker.created.lock().unwrap();
    let issue = created.first().expect("one issue");
    assert!(issue.description.contains("alice@example.com"));
    assert!(issue
        .description
        .contains("https://slack.example/archives/C1/p1700000000.000100"));
    assert!(issue.description.contains("VPN is down"));
    assert_eq!(issue.summary, "[support] VPN is down...");
}

#[tokio::test]
async fn recreation_shadows_the_previous_key() {
    let messaging = MockMessaging::default();
    let tracker = MockTracker::default();
    let thread = thread_ref();

    create_ticket(&messaging, &tracker, &origin(), "support", &thread)
        .await
        .expect("first ticket");
    create_ticket(&messaging, &tracker, &origin(), "support", &thread)
        .await
        .expect("second ticket");

    let history = messaging.thread.lock().unwrap().clone();
    assert_eq!(find_ticket_key(&history), Some(TicketKey("SUP-2".into())));
}

#[tokio::test]
async fn tracker_failure_posts_no_announcement() {
    let messaging = MockMessaging::default();
    let tracker = MockTracker::default();
    tracker
        .fail_create
        .store(true, std::sync::atomic::Ordering::SeqCst);

    let result = create_ticket(&messaging, &tracker, &origin(), "support", &thread_ref()).await;

    assert!(result.is_err());
    assert!(messaging.posted_texts().is_empty());
}
