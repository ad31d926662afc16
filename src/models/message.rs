//! Thread and message identities as seen by the engine.

/// Identifies a thread by channel and root timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRef {
    /// Channel ID the thread lives in.
    pub channel: String,
    /// Timestamp of the thread's root message.
    pub root_ts: String,
}

/// One message in a fetched thread history.
///
/// Histories are fetched on demand and never cached across invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadMessage {
    /// Author user ID, absent for bot-authored messages.
    pub user: Option<String>,
    /// Bot ID, present for bot-authored messages.
    pub bot_id: Option<String>,
    /// Message body text.
    pub text: String,
    /// Message timestamp.
    pub ts: String,
}

/// The message a ticket creation originates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginMessage {
    /// Channel ID the message was posted in.
    pub channel: String,
    /// Timestamp of the originating message.
    pub ts: String,
    /// Author user ID.
    pub user_id: String,
    /// Raw message text.
    pub text: String,
}
