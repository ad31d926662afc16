//! Announcement format and thread-to-ticket correlation.
//!
//! The announcement posted after ticket creation is the sole durable
//! linkage between a thread and its ticket. The writer template and the
//! reader regex live here together and share one prefix constant so they
//! cannot drift. The rendered format is versioned by this module: it must
//! stay parseable against announcements already present in historical
//! threads.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::models::message::ThreadMessage;
use crate::models::ticket::TicketKey;

/// Fixed lead-in of every creation announcement.
pub const ANNOUNCEMENT_PREFIX: &str = "Ticket created:";

#[allow(clippy::expect_used)] // pattern is a literal; cannot fail at runtime
fn announcement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"{ANNOUNCEMENT_PREFIX}.*?\|([A-Z]+-\d+)>"))
            .expect("announcement pattern compiles")
    })
}

/// Render the announcement reply posted into the originating thread.
///
/// The bracket-pipe hyperlink `<url|KEY>` is what
/// [`find_ticket_key`] recognizes later.
#[must_use]
pub fn announcement_text(key: &TicketKey, browse_url: &str) -> String {
    format!(
        "{ANNOUNCEMENT_PREFIX} <{browse_url}|{key}>\nPlease wait while your request is picked up."
    )
}

/// Scan a thread history for the ticket key announced by this system.
///
/// Scans in the supplied (chronological) order and keeps the **last**
/// match, so a recreated ticket shadows any stale key from an earlier
/// announcement. An unassociated thread is an expected state, logged at
/// debug level only.
#[must_use]
pub fn find_ticket_key(messages: &[ThreadMessage]) -> Option<TicketKey> {
    let mut found = None;
    for message in messages {
        if let Some(caps) = announcement_re().captures(&message.text) {
            found = Some(TicketKey(caps[1].to_owned()));
        }
    }

    if found.is_none() {
        debug!("no ticket announcement found in thread history");
    }
    found
}
