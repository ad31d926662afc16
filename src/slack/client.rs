//! Slack Web API client and supervised Socket Mode listener.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use slack_morphism::prelude::{
    SlackApiChatGetPermalinkRequest, SlackApiChatPostMessageRequest,
    SlackApiConversationsInfoRequest, SlackApiConversationsRepliesRequest,
    SlackApiReactionsAddRequest, SlackApiReactionsGetRequest, SlackApiReactionsRemoveRequest,
    SlackApiToken, SlackApiTokenType, SlackApiTokenValue, SlackApiUsersInfoRequest,
    SlackChannelId, SlackClient, SlackClientEventsListenerEnvironment,
    SlackClientHyperHttpsConnector, SlackClientSession, SlackClientSocketModeConfig,
    SlackClientSocketModeListener, SlackHistoryMessage, SlackMessageContent, SlackReactionName,
    SlackSocketModeListenerCallbacks, SlackTs, SlackUserId,
};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::bridge::{Messaging, UserProfile};
use crate::config::SlackConfig;
use crate::models::message::{ThreadMessage, ThreadRef};
use crate::slack::events;
use crate::state::AppState;
use crate::{AppError, Result};

/// Fixed delay before the supervisor restarts a failed event loop.
const RESTART_DELAY: Duration = Duration::from_secs(10);

/// Page size for thread history pagination.
const HISTORY_PAGE_LIMIT: u16 = 200;

/// Slack client wrapper owning the Web API and Socket Mode tokens.
///
/// Constructed once at startup; every handler invocation receives it by
/// reference through [`AppState`].
pub struct SlackService {
    client: Arc<SlackClient<SlackClientHyperHttpsConnector>>,
    bot_token: SlackApiToken,
    app_token: SlackApiToken,
}

impl SlackService {
    /// Build the HTTPS client and API tokens.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the HTTPS connector cannot be created.
    pub fn new(config: &SlackConfig) -> Result<Self> {
        let connector = SlackClientHyperHttpsConnector::new()
            .map_err(|err| AppError::Slack(format!("failed to init slack connector: {err}")))?;
        let client = Arc::new(SlackClient::new(connector));
        let bot_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.bot_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::Bot),
        };
        let app_token = SlackApiToken {
            token_value: SlackApiTokenValue(config.app_token.clone()),
            cookie: None,
            team_id: None,
            scope: None,
            token_type: Some(SlackApiTokenType::App),
        };

        Ok(Self {
            client,
            bot_token,
            app_token,
        })
    }

    /// Create an HTTP session for direct API calls using the bot token.
    #[must_use]
    pub fn http_session(&self) -> SlackClientSession<'_, SlackClientHyperHttpsConnector> {
        self.client.open_session(&self.bot_token)
    }

    /// Run one Socket Mode connection lifetime: connect, serve events,
    /// return when the connection dies.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Slack` if the initial connection fails.
    async fn listen(&self, state: Arc<AppState>) -> Result<()> {
        let listener_env = Arc::new(
            SlackClientEventsListenerEnvironment::new(Arc::clone(&self.client))
                .with_user_state(state)
                .with_error_handler(|err, _client, _state| {
                    error!(?err, "socket mode error");
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR
                }),
        );
        let callbacks = SlackSocketModeListenerCallbacks::new()
            .with_hello_events(events::handle_hello)
            .with_push_events(events::handle_push);
        let config = SlackClientSocketModeConfig {
            max_connections_count: SlackClientSocketModeConfig::DEFAULT_CONNECTIONS_COUNT,
            debug_connections: SlackClientSocketModeConfig::DEFAULT_DEBUG_CONNECTIONS,
            initial_backoff_in_seconds:
                SlackClientSocketModeConfig::DEFAULT_INITIAL_BACKOFF_IN_SECONDS,
            reconnect_timeout_in_seconds:
                SlackClientSocketModeConfig::DEFAULT_RECONNECT_TIMEOUT_IN_SECONDS,
            ping_interval_in_seconds: SlackClientSocketModeConfig::DEFAULT_PING_INTERVAL_IN_SECONDS,
            ping_failure_threshold_times:
                SlackClientSocketModeConfig::DEFAULT_PING_FAILURE_THRESHOLD_TIMES,
        };

        let listener = SlackClientSocketModeListener::new(&config, listener_env, callbacks);
        listener
            .listen_for(&self.app_token)
            .await
            .map_err(|err| AppError::Slack(format!("socket mode connect failed: {err}")))?;

        listener.serve().await;
        Ok(())
    }
}

/// Run the Socket Mode event loop, restarting it after a fixed delay when
/// it fails or exits.
///
/// All correlation state is recomputed from the platform's durable history,
/// so a restart discards nothing.
pub async fn run_supervised(state: Arc<AppState>, ct: CancellationToken) {
    loop {
        if ct.is_cancelled() {
            return;
        }

        info!("starting socket mode event loop");
        tokio::select! {
            () = ct.cancelled() => {
                state.connection.set_connected(false);
                return;
            }
            result = state.slack.listen(Arc::clone(&state)) => {
                state.connection.set_connected(false);
                match result {
                    Ok(()) => warn!("socket mode event loop exited"),
                    Err(err) => error!(%err, "socket mode event loop failed"),
                }
            }
        }

        tokio::select! {
            () = ct.cancelled() => return,
            () = sleep(RESTART_DELAY) => {}
        }
    }
}

fn thread_message_from(message: SlackHistoryMessage) -> ThreadMessage {
    ThreadMessage {
        user: message.sender.user.map(|u| u.0),
        bot_id: message.sender.bot_id.map(|b| b.0),
        text: message.content.text.unwrap_or_default(),
        ts: message.origin.ts.0,
    }
}

#[async_trait]
impl Messaging for SlackService {
    async fn fetch_thread(&self, thread: &ThreadRef) -> Result<Vec<ThreadMessage>> {
        let session = self.http_session();
        let channel = SlackChannelId(thread.channel.clone());
        let root_ts = SlackTs(thread.root_ts.clone());

        let mut messages = Vec::new();
        let mut cursor = None;
        loop {
            let mut request =
                SlackApiConversationsRepliesRequest::new(channel.clone(), root_ts.clone())
                    .with_limit(HISTORY_PAGE_LIMIT);
            if let Some(next) = cursor.take() {
                request = request.with_cursor(next);
            }

            let response = session
                .conversations_replies(&request)
                .await
                .map_err(|err| AppError::Slack(format!("failed to fetch thread history: {err}")))?;

            messages.extend(response.messages.into_iter().map(thread_message_from));

            cursor = response
                .response_metadata
                .and_then(|meta| meta.next_cursor)
                .filter(|next| !next.0.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(messages)
    }

    async fn post_in_thread(&self, thread: &ThreadRef, text: &str) -> Result<()> {
        let content = SlackMessageContent {
            text: Some(text.to_owned()),
            blocks: None,
            attachments: None,
            upload: None,
            files: None,
            reactions: None,
            metadata: None,
        };
        let request = SlackApiChatPostMessageRequest {
            channel: SlackChannelId(thread.channel.clone()),
            content,
            as_user: None,
            icon_emoji: None,
            icon_url: None,
            link_names: Some(true),
            parse: None,
            thread_ts: Some(SlackTs(thread.root_ts.clone())),
            username: None,
            reply_broadcast: None,
            unfurl_links: None,
            unfurl_media: None,
        };

        self.http_session()
            .chat_post_message(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to post message: {err}")))?;
        Ok(())
    }

    async fn permalink(&self, channel: &str, ts: &str) -> Result<String> {
        let request = SlackApiChatGetPermalinkRequest::new(
            SlackChannelId(channel.to_owned()),
            SlackTs(ts.to_owned()),
        );
        let response = self
            .http_session()
            .chat_get_permalink(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to get permalink: {err}")))?;
        Ok(response.permalink.to_string())
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile> {
        let request = SlackApiUsersInfoRequest::new(SlackUserId(user_id.to_owned()));
        let response = self
            .http_session()
            .users_info(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to look up user: {err}")))?;

        let user = response.user;
        let display_name = user
            .real_name
            .clone()
            .or_else(|| {
                user.profile
                    .as_ref()
                    .and_then(|profile| profile.display_name.clone())
            })
            .unwrap_or_else(|| user_id.to_owned());
        let email = user
            .profile
            .and_then(|profile| profile.email)
            .map(|email| email.0);

        Ok(UserProfile {
            display_name,
            email,
        })
    }

    async fn channel_name(&self, channel_id: &str) -> Result<String> {
        let request = SlackApiConversationsInfoRequest::new(SlackChannelId(channel_id.to_owned()));
        let response = self
            .http_session()
            .conversations_info(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to look up channel: {err}")))?;
        Ok(response.channel.name.unwrap_or_default())
    }

    async fn add_reaction(&self, thread: &ThreadRef, name: &str) -> Result<()> {
        let request = SlackApiReactionsAddRequest::new(
            SlackChannelId(thread.channel.clone()),
            SlackReactionName(name.to_owned()),
            SlackTs(thread.root_ts.clone()),
        );
        self.http_session()
            .reactions_add(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to add reaction: {err}")))?;
        Ok(())
    }

    async fn remove_reaction(&self, thread: &ThreadRef, name: &str) -> Result<()> {
        let request = SlackApiReactionsRemoveRequest::new(SlackReactionName(name.to_owned()))
            .with_channel(SlackChannelId(thread.channel.clone()))
            .with_timestamp(SlackTs(thread.root_ts.clone()));
        self.http_session()
            .reactions_remove(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to remove reaction: {err}")))?;
        Ok(())
    }

    async fn list_reactions(&self, thread: &ThreadRef) -> Result<Vec<String>> {
        let request = SlackApiReactionsGetRequest::new(
            SlackChannelId(thread.channel.clone()),
            SlackTs(thread.root_ts.clone()),
        );
        let response = self
            .http_session()
            .reactions_get(&request)
            .await
            .map_err(|err| AppError::Slack(format!("failed to list reactions: {err}")))?;

        Ok(response
            .message
            .content
            .reactions
            .unwrap_or_default()
            .into_iter()
            .map(|reaction| reaction.name.0)
            .collect())
    }
}
