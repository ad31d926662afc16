//! Channel-message handler: root messages in watched channels create tickets.

use std::sync::Arc;

use slack_morphism::prelude::SlackMessageEvent;
use tracing::{debug, error};

use crate::bridge::{create, Messaging};
use crate::models::message::{OriginMessage, ThreadRef};
use crate::state::AppState;

/// Create a ticket for a fresh, human-authored root message posted in one
/// of the watched channels. Everything else is ignored.
pub async fn handle_channel_message(state: Arc<AppState>, event: SlackMessageEvent) {
    // Only fresh human root messages qualify: no bot echoes, no thread
    // replies, no edits/joins/other subtyped events.
    if event.sender.bot_id.is_some()
        || event.origin.thread_ts.is_some()
        || event.subtype.is_some()
    {
        return;
    }
    let Some(user) = event.sender.user else {
        return;
    };
    let Some(channel) = event.origin.channel else {
        return;
    };

    let channel_id = channel.0;
    let ts = event.origin.ts.0;
    let text = event
        .content
        .and_then(|content| content.text)
        .unwrap_or_default();

    let channel_name = match state.slack.channel_name(&channel_id).await {
        Ok(name) => name,
        Err(err) => {
            error!(%err, channel = %channel_id, "failed to resolve channel name");
            return;
        }
    };
    if !state.config.is_included_channel(&channel_name) {
        debug!(channel = %channel_name, "channel not watched; ignoring message");
        return;
    }

    let origin = OriginMessage {
        channel: channel_id.clone(),
        ts: ts.clone(),
        user_id: user.0,
        text,
    };
    let thread = ThreadRef {
        channel: channel_id,
        root_ts: ts,
    };

    if let Err(err) =
        create::create_ticket(&state.slack, &state.tracker, &origin, &channel_name, &thread).await
    {
        error!(
            %err,
            channel = %thread.channel,
            thread_ts = %thread.root_ts,
            "ticket creation failed"
        );
    }
}
