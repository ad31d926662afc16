//! Thread-to-ticket correlation and command-resolution engine.
//!
//! The engine is written against the [`Messaging`] and [`Tracker`] seams so
//! the production clients, the event handlers, and the test doubles all
//! share one code path. Handlers receive constructed-once client handles by
//! reference; nothing in here holds mutable state between invocations.

pub mod assign;
pub mod create;
pub mod effects;
pub mod transition;

use async_trait::async_trait;

use crate::models::message::{ThreadMessage, ThreadRef};
use crate::models::ticket::TicketKey;
use crate::tracker::types::{CreatedIssue, NewIssue, Principal, Transition};
use crate::Result;

/// Resolved identity of a messaging-platform user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Display name shown in ticket descriptions.
    pub display_name: String,
    /// Email used for authorization and assignment, when visible.
    pub email: Option<String>,
}

/// Messaging-platform surface consumed by the engine.
#[async_trait]
pub trait Messaging: Send + Sync {
    /// Full, cursor-paginated history of a thread, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) on any underlying
    /// call failure. Callers must treat that as "history unknown", not
    /// "thread empty".
    async fn fetch_thread(&self, thread: &ThreadRef) -> Result<Vec<ThreadMessage>>;

    /// Post a reply into a thread.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) if the post fails.
    async fn post_in_thread(&self, thread: &ThreadRef, text: &str) -> Result<()>;

    /// Permalink to a single message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) on call failure.
    async fn permalink(&self, channel: &str, ts: &str) -> Result<String>;

    /// Display name and email of a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) on call failure.
    async fn user_profile(&self, user_id: &str) -> Result<UserProfile>;

    /// Human-readable name of a channel.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) on call failure.
    async fn channel_name(&self, channel_id: &str) -> Result<String>;

    /// Add a reaction to the thread's root message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) on call failure.
    async fn add_reaction(&self, thread: &ThreadRef, name: &str) -> Result<()>;

    /// Remove a reaction from the thread's root message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) on call failure.
    async fn remove_reaction(&self, thread: &ThreadRef, name: &str) -> Result<()>;

    /// Names of the reactions currently on the thread's root message.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Slack`](crate::AppError::Slack) on call failure.
    async fn list_reactions(&self, thread: &ThreadRef) -> Result<Vec<String>>;
}

/// Issue tracker surface consumed by the engine.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Create a ticket and return its key and browse link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`](crate::AppError::Tracker) on call failure.
    async fn create_issue(&self, fields: &NewIssue) -> Result<CreatedIssue>;

    /// The ticket's currently available transitions.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`](crate::AppError::Tracker) on call failure.
    async fn transitions(&self, key: &TicketKey) -> Result<Vec<Transition>>;

    /// Apply a transition by ID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`](crate::AppError::Tracker) on call
    /// failure, including an attempt that the tracker rejects as no longer
    /// applicable.
    async fn apply_transition(&self, key: &TicketKey, transition_id: &str) -> Result<()>;

    /// Tracker users matching an email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`](crate::AppError::Tracker) on call failure.
    async fn search_users(&self, email: &str) -> Result<Vec<Principal>>;

    /// Assign the ticket to a principal.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`](crate::AppError::Tracker) on call failure.
    async fn assign(&self, key: &TicketKey, account_id: &str) -> Result<()>;

    /// Add a comment to the ticket.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`](crate::AppError::Tracker) on call failure.
    async fn add_comment(&self, key: &TicketKey, body: &str) -> Result<()>;

    /// Attach a file to the ticket.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Tracker`](crate::AppError::Tracker) on call failure.
    async fn add_attachment(&self, key: &TicketKey, filename: &str, content: &[u8]) -> Result<()>;

    /// Browse URL for a ticket key.
    fn browse_url(&self, key: &TicketKey) -> String;
}
