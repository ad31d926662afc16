//! Assignment of a ticket to the unique tracker principal for an email.

use tracing::info;

use crate::bridge::Tracker;
use crate::models::ticket::TicketKey;
use crate::Result;

/// Result of resolving a reporter email to a unique tracker principal.
///
/// Zero matches and more-than-one matches collapse into the same
/// non-fatal `NoUniqueMatch` outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// Exactly one principal matched and the ticket was assigned.
    Assigned,
    /// Resolution failed; the ticket was left unassigned.
    NoUniqueMatch {
        /// How many principals the search returned.
        candidates: usize,
    },
}

/// Assign `key` to the principal uniquely matching `email`.
///
/// Assignment is best-effort and decoupled from the status transition:
/// callers surface a `NoUniqueMatch` to the thread and proceed.
///
/// # Errors
///
/// Returns [`AppError::Tracker`](crate::AppError::Tracker) if the user
/// search or the assignment call fails.
pub async fn assign_by_email(
    tracker: &dyn Tracker,
    key: &TicketKey,
    email: &str,
) -> Result<AssignOutcome> {
    let principals = tracker.search_users(email).await?;

    if let [principal] = principals.as_slice() {
        tracker.assign(key, &principal.account_id).await?;
        info!(ticket = %key, email, "ticket assigned");
        Ok(AssignOutcome::Assigned)
    } else {
        Ok(AssignOutcome::NoUniqueMatch {
            candidates: principals.len(),
        })
    }
}
