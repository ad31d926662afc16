//! Mention handler: parses commands and drives the ticket lifecycle.

use std::sync::Arc;

use slack_morphism::prelude::SlackAppMentionEvent;
use tracing::{debug, error, info, warn};

use crate::bridge::assign::{self, AssignOutcome};
use crate::bridge::transition::{self, TransitionOutcome};
use crate::bridge::{create, effects, Messaging, Tracker};
use crate::correlate;
use crate::models::command::{Command, VALID_COMMANDS};
use crate::models::message::{OriginMessage, ThreadRef};
use crate::state::AppState;
use crate::Result;

const UNAUTHORIZED_REPLY: &str = "You are not authorized to use this command.";
const NO_TICKET_REPLY: &str = "I couldn't find a tracker ticket associated with this thread.";

/// Entry point for `app_mention` events.
///
/// Mentions outside a thread are ignored; inside a thread the text is
/// parsed as a command and resolved against the thread's correlated
/// ticket. Failures are logged and surfaced to the thread, never panicked.
pub async fn handle_mention(state: Arc<AppState>, event: SlackAppMentionEvent) {
    // Commands only make sense inside an existing thread.
    let Some(thread_ts) = event.origin.thread_ts.clone() else {
        debug!("mention outside a thread; ignoring");
        return;
    };
    let thread = ThreadRef {
        channel: event.channel.0.clone(),
        root_ts: thread_ts.0,
    };

    if let Err(err) = process_mention(&state, &thread, &event).await {
        error!(
            %err,
            channel = %thread.channel,
            thread_ts = %thread.root_ts,
            "mention processing failed"
        );
        post_best_effort(
            &state,
            &thread,
            "Something went wrong while processing the command.",
        )
        .await;
    }
}

async fn process_mention(
    state: &AppState,
    thread: &ThreadRef,
    event: &SlackAppMentionEvent,
) -> Result<()> {
    let user_id = event.user.0.clone();
    let profile = state.slack.user_profile(&user_id).await?;

    // Authorization strictly precedes any mutating path. Unauthorized
    // senders get the fixed reply, one log line, and nothing else: no
    // reaction mutation, nothing sent to the tracker.
    let email = profile.email.unwrap_or_default();
    if email.is_empty() || !state.config.is_included_user(&email) {
        warn!(user = %user_id, channel = %thread.channel, "unauthorized mention rejected");
        state.slack.post_in_thread(thread, UNAUTHORIZED_REPLY).await?;
        return Ok(());
    }

    let text = event.content.text.clone().unwrap_or_default();
    match Command::parse(&text) {
        Command::Create => recreate_ticket(state, thread, event).await,
        Command::Invalid(token) => {
            state
                .slack
                .post_in_thread(
                    thread,
                    &format!(
                        "Unknown command `{token}`. Valid commands: {}.",
                        VALID_COMMANDS.join(", ")
                    ),
                )
                .await
        }
        command => run_lifecycle_command(state, thread, &command, &email).await,
    }
}

/// `create` inside a thread provisions a fresh ticket; its announcement
/// shadows any earlier key during later correlation.
async fn recreate_ticket(
    state: &AppState,
    thread: &ThreadRef,
    event: &SlackAppMentionEvent,
) -> Result<()> {
    let channel_name = state.slack.channel_name(&thread.channel).await?;
    let origin = OriginMessage {
        channel: thread.channel.clone(),
        ts: event.origin.ts.0.clone(),
        user_id: event.user.0.clone(),
        text: event.content.text.clone().unwrap_or_default(),
    };

    create::create_ticket(&state.slack, &state.tracker, &origin, &channel_name, thread).await?;
    Ok(())
}

async fn run_lifecycle_command(
    state: &AppState,
    thread: &ThreadRef,
    command: &Command,
    email: &str,
) -> Result<()> {
    // Recover the ticket key from history. A transport failure here
    // degrades to the same user-visible "no ticket found" reply; the log
    // line distinguishes unknown history from an unassociated thread.
    let key = match state.slack.fetch_thread(thread).await {
        Ok(messages) => correlate::find_ticket_key(&messages),
        Err(err) => {
            warn!(
                %err,
                channel = %thread.channel,
                thread_ts = %thread.root_ts,
                "thread history unavailable"
            );
            None
        }
    };
    let Some(key) = key else {
        state.slack.post_in_thread(thread, NO_TICKET_REPLY).await?;
        return Ok(());
    };

    let Some(target_state) = command.target_state() else {
        return Ok(());
    };

    // Assignment is best-effort and decoupled: whatever happens here, the
    // status transition below still proceeds.
    if *command == Command::Start {
        match assign::assign_by_email(&state.tracker, &key, email).await {
            Ok(AssignOutcome::Assigned) => {
                post_best_effort(state, thread, &format!("Ticket assigned to {email}.")).await;
            }
            Ok(AssignOutcome::NoUniqueMatch { candidates }) => {
                info!(ticket = %key, email, candidates, "no unique principal for email");
                post_best_effort(
                    state,
                    thread,
                    &format!("Could not find a unique tracker user with the email {email}."),
                )
                .await;
            }
            Err(err) => {
                error!(%err, ticket = %key, email, "assignment failed");
                post_best_effort(state, thread, &format!("Could not assign ticket {key}.")).await;
            }
        }
    }

    match transition::resolve_and_apply(&state.tracker, &key, target_state).await {
        Ok(TransitionOutcome::Applied { name }) => {
            let url = state.tracker.browse_url(&key);
            post_best_effort(
                state,
                thread,
                &format!("Ticket <{url}|{key}> status changed to '{name}'."),
            )
            .await;
            effects::finalize(
                &state.slack,
                &state.tracker,
                state.summarizer_seam(),
                thread,
                &key,
                command,
            )
            .await;
            Ok(())
        }
        Ok(TransitionOutcome::Unavailable { available }) => {
            state
                .slack
                .post_in_thread(
                    thread,
                    &format!(
                        "Cannot move to '{target_state}'. Available statuses: {}.",
                        available.join(", ")
                    ),
                )
                .await
        }
        Err(err) => {
            error!(
                %err,
                ticket = %key,
                channel = %thread.channel,
                thread_ts = %thread.root_ts,
                "transition failed"
            );
            state
                .slack
                .post_in_thread(
                    thread,
                    &format!("Something went wrong while processing the command for ticket {key}."),
                )
                .await
        }
    }
}

async fn post_best_effort(state: &AppState, thread: &ThreadRef, text: &str) {
    if let Err(err) = state.slack.post_in_thread(thread, text).await {
        warn!(
            %err,
            channel = %thread.channel,
            thread_ts = %thread.root_ts,
            "failed to post reply"
        );
    }
}
