//! Post-transition side effects: markers, archive, summary.
//!
//! Every sub-action here is independent and best-effort. A failed
//! sub-action is logged with thread id, ticket key, and action name, and
//! never prevents the remaining sub-actions. There is no two-phase commit
//! across the tracker and the messaging platform: the applied transition
//! is never rolled back, and partial success is the accepted steady state.

use chrono::Utc;
use tracing::{debug, warn};

use crate::bridge::{Messaging, Tracker};
use crate::models::command::Command;
use crate::models::marker::Marker;
use crate::models::message::{ThreadMessage, ThreadRef};
use crate::models::ticket::TicketKey;
use crate::summarizer::Summarize;

/// Run the command-specific post-actions after a successful transition.
///
/// - `Done`: archive the thread history as a ticket attachment, optionally
///   summarize it (commenting the summary on the ticket and posting it back
///   to the thread), then set the done marker.
/// - `Cancel`: set the canceled marker.
/// - `Start`/`Restart`: set the in-progress marker.
///
/// Marker updates always clear existing markers first, so at most one is
/// visible when the dust settles.
pub async fn finalize(
    messaging: &dyn Messaging,
    tracker: &dyn Tracker,
    summarizer: Option<&dyn Summarize>,
    thread: &ThreadRef,
    key: &TicketKey,
    command: &Command,
) {
    if *command == Command::Done {
        archive_and_summarize(messaging, tracker, summarizer, thread, key).await;
    }

    if let Some(marker) = Marker::for_command(command) {
        set_marker(messaging, thread, marker).await;
    }
}

async fn archive_and_summarize(
    messaging: &dyn Messaging,
    tracker: &dyn Tracker,
    summarizer: Option<&dyn Summarize>,
    thread: &ThreadRef,
    key: &TicketKey,
) {
    let messages = match messaging.fetch_thread(thread).await {
        Ok(messages) => messages,
        Err(err) => {
            warn!(
                %err,
                ticket = %key,
                thread_ts = %thread.root_ts,
                action = "fetch_thread_archive",
                "skipping archive and summary"
            );
            return;
        }
    };

    let filename = format!("{key}-thread-{}.txt", Utc::now().format("%Y%m%dT%H%M%SZ"));
    if let Err(err) = tracker
        .add_attachment(key, &filename, render_archive(&messages).as_bytes())
        .await
    {
        warn!(
            %err,
            ticket = %key,
            thread_ts = %thread.root_ts,
            action = "archive_attachment",
            "failed to attach thread archive"
        );
    }

    let Some(summarizer) = summarizer else { return };

    match summarizer.summarize(&concat_bodies(&messages)).await {
        Ok(summary) if !summary.trim().is_empty() => {
            if let Err(err) = tracker.add_comment(key, &summary).await {
                warn!(
                    %err,
                    ticket = %key,
                    thread_ts = %thread.root_ts,
                    action = "summary_comment",
                    "failed to comment summary on ticket"
                );
            }
            if let Err(err) = messaging
                .post_in_thread(thread, &format!("Thread summary:\n{summary}"))
                .await
            {
                warn!(
                    %err,
                    ticket = %key,
                    thread_ts = %thread.root_ts,
                    action = "summary_post",
                    "failed to post summary to thread"
                );
            }
        }
        Ok(_) => {
            debug!(ticket = %key, thread_ts = %thread.root_ts, "summarizer returned empty text");
        }
        Err(err) => {
            warn!(
                %err,
                ticket = %key,
                thread_ts = %thread.root_ts,
                action = "summarize",
                "summarizer call failed"
            );
        }
    }
}

/// Clear existing markers from the thread root, then ensure `marker` is set.
///
/// Best-effort, not transactional: each removal and the final add are
/// logged individually on failure. A marker that is already present is
/// left in place rather than re-added, so repeating a command does not
/// double it.
pub async fn set_marker(messaging: &dyn Messaging, thread: &ThreadRef, marker: Marker) {
    let mut already_set = false;

    match messaging.list_reactions(thread).await {
        Ok(names) => {
            for name in names {
                if name == marker.reaction_name() {
                    already_set = true;
                    continue;
                }
                if Marker::from_reaction_name(&name).is_none() {
                    continue;
                }
                if let Err(err) = messaging.remove_reaction(thread, &name).await {
                    warn!(
                        %err,
                        thread_ts = %thread.root_ts,
                        reaction = %name,
                        action = "marker_clear",
                        "failed to remove stale marker"
                    );
                }
            }
        }
        Err(err) => {
            warn!(
                %err,
                thread_ts = %thread.root_ts,
                action = "marker_list",
                "could not list reactions; adding marker anyway"
            );
        }
    }

    if already_set {
        return;
    }

    if let Err(err) = messaging
        .add_reaction(thread, marker.reaction_name())
        .await
    {
        warn!(
            %err,
            thread_ts = %thread.root_ts,
            reaction = marker.reaction_name(),
            action = "marker_add",
            "failed to add marker"
        );
    }
}

/// Plain-text rendering of a thread history for the ticket attachment.
#[must_use]
pub fn render_archive(messages: &[ThreadMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let author = message
                .user
                .as_deref()
                .or(message.bot_id.as_deref())
                .unwrap_or("unknown");
            format!("[{}] {author}: {}", message.ts, message.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Concatenated message bodies fed to the summarizer.
#[must_use]
pub fn concat_bodies(messages: &[ThreadMessage]) -> String {
    messages
        .iter()
        .map(|message| message.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
