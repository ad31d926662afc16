//! Socket Mode push event dispatch.
//!
//! Each qualifying event is handled in its own spawned task: handlers
//! share only the constructed-once client handles in [`AppState`], and
//! correlation state is recomputed from platform history per invocation.
//! Two events in the same thread may therefore interleave; last writer
//! wins on markers and tracker state.

use std::sync::Arc;

use slack_morphism::prelude::{
    SlackClient, SlackClientEventsUserState, SlackClientHyperHttpsConnector,
    SlackEventCallbackBody, SlackPushEventCallback, SlackSocketModeHelloEvent,
};
use tracing::{debug, warn};

use crate::slack::handlers;
use crate::state::AppState;

async fn app_state(state: &SlackClientEventsUserState) -> Option<Arc<AppState>> {
    let guard = state.read().await;
    guard.get_user_state::<Arc<AppState>>().cloned()
}

/// Mark the event-source connection live on Socket Mode hello.
pub async fn handle_hello(
    event: SlackSocketModeHelloEvent,
    _client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    state: SlackClientEventsUserState,
) {
    debug!(?event, "socket hello");
    if let Some(app) = app_state(&state).await {
        app.connection.set_connected(true);
    }
}

/// Dispatch push events to the message / mention handlers.
///
/// # Errors
///
/// Never fails: per-event errors are handled and logged inside the
/// spawned handler tasks.
pub async fn handle_push(
    event: SlackPushEventCallback,
    _client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    state: SlackClientEventsUserState,
) -> slack_morphism::UserCallbackResult<()> {
    let Some(app) = app_state(&state).await else {
        warn!("app state not available; dropping push event");
        return Ok(());
    };

    match event.event {
        SlackEventCallbackBody::Message(message_event) => {
            tokio::spawn(handlers::message::handle_channel_message(
                app,
                message_event,
            ));
        }
        SlackEventCallbackBody::AppMention(mention_event) => {
            tokio::spawn(handlers::mention::handle_mention(app, mention_event));
        }
        other => {
            debug!(?other, "ignored push event");
        }
    }

    Ok(())
}
