//! Ticket creation from an originating channel message or mention.

use tracing::info;

use crate::bridge::{Messaging, Tracker};
use crate::correlate;
use crate::models::message::{OriginMessage, ThreadRef};
use crate::models::ticket::TicketKey;
use crate::tracker::types::NewIssue;
use crate::Result;

/// Character cap for the lossy summary prefix.
const SUMMARY_PREFIX_LEN: usize = 50;

/// Create a ticket from an originating message and announce it in-thread.
///
/// The announcement reply posted into `announce_in` is the sole durable
/// linkage between the thread and the ticket; it follows the fixed pattern
/// recovered later by [`correlate::find_ticket_key`].
///
/// # Errors
///
/// Returns [`AppError::Slack`](crate::AppError::Slack) if requester lookup,
/// permalink resolution, or the announcement post fails, and
/// [`AppError::Tracker`](crate::AppError::Tracker) if the ticket cannot be
/// created.
pub async fn create_ticket(
    messaging: &dyn Messaging,
    tracker: &dyn Tracker,
    origin: &OriginMessage,
    channel_name: &str,
    announce_in: &ThreadRef,
) -> Result<TicketKey> {
    let profile = messaging.user_profile(&origin.user_id).await?;
    let permalink = messaging.permalink(&origin.channel, &origin.ts).await?;

    let email = profile.email.as_deref().unwrap_or("unknown");
    let description = format!(
        "Requested by: {} ({email})\nSlack thread: {permalink}\n\nMessage: {}",
        profile.display_name, origin.text,
    );

    let fields = NewIssue {
        summary: summary_of(channel_name, &origin.text),
        description,
    };
    let created = tracker.create_issue(&fields).await?;

    messaging
        .post_in_thread(
            announce_in,
            &correlate::announcement_text(&created.key, &created.url),
        )
        .await?;

    info!(
        ticket = %created.key,
        channel = %origin.channel,
        thread_ts = %announce_in.root_ts,
        "ticket created and announced"
    );

    Ok(created.key)
}

/// Lossy short summary: `[channel]` prefix plus the message text stripped
/// to `[A-Za-z0-9 ]` and truncated to a fixed prefix length with an
/// ellipsis suffix.
///
/// Never used for correlation; that always goes through the announcement
/// message.
#[must_use]
pub fn summary_of(channel_name: &str, text: &str) -> String {
    let clean: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect();
    let prefix: String = clean.chars().take(SUMMARY_PREFIX_LEN).collect();
    format!("[{channel_name}] {prefix}...")
}
