//! Wire types for the tracker REST API.

use serde::Deserialize;

use crate::models::ticket::TicketKey;

/// A workflow move currently available on a ticket.
///
/// The available set is ticket-state-dependent and fetched fresh per
/// request, never assumed stable.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Transition {
    /// Transition ID used to apply the move.
    pub id: String,
    /// Display name of the target state.
    pub name: String,
}

/// A tracker user returned by an email search.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Stable account identifier used for assignment.
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// Email, when visible to the API user.
    #[serde(rename = "emailAddress", default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

/// Fields for a new ticket.
///
/// Project and optional parent come from configuration, not from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Short, lossy summary line.
    pub summary: String,
    /// Full description with requester identity and permalink.
    pub description: String,
}

/// Key and browse link of a freshly created ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// The new ticket's key.
    pub key: TicketKey,
    /// Browse URL announced back into the thread.
    pub url: String,
}
