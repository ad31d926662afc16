//! Live transition resolution against a ticket's current workflow state.

use tracing::info;

use crate::bridge::Tracker;
use crate::models::ticket::TicketKey;
use crate::tracker::types::Transition;
use crate::Result;

/// Result of resolving a target state against the live transition set.
///
/// `Unavailable` is a normal negative outcome, not an error: it carries
/// the currently available transition names verbatim so the caller can
/// present actionable feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The matching transition was applied.
    Applied {
        /// Display name of the state the ticket moved to.
        name: String,
    },
    /// The target state is not reachable from the ticket's current state.
    Unavailable {
        /// Display names of the transitions that are available right now.
        available: Vec<String>,
    },
}

/// Case-insensitive exact match of a target state name against the live set.
#[must_use]
pub fn find_transition<'a>(
    target_state: &str,
    transitions: &'a [Transition],
) -> Option<&'a Transition> {
    transitions
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(target_state))
}

/// Fetch the ticket's live transitions and apply the one matching
/// `target_state`, if any.
///
/// The transition set is fetched fresh on every call: it changes as the
/// ticket moves through its workflow. Concurrent requests on the same
/// ticket are not serialized here; a duplicate attempt against an
/// already-moved ticket surfaces as `Unavailable` (or as the tracker's own
/// rejection), never as a crash.
///
/// # Errors
///
/// Returns [`AppError::Tracker`](crate::AppError::Tracker) if fetching the
/// transition set or applying the matched transition fails.
pub async fn resolve_and_apply(
    tracker: &dyn Tracker,
    key: &TicketKey,
    target_state: &str,
) -> Result<TransitionOutcome> {
    let transitions = tracker.transitions(key).await?;

    match find_transition(target_state, &transitions) {
        Some(transition) => {
            tracker.apply_transition(key, &transition.id).await?;
            info!(ticket = %key, state = %transition.name, "transition applied");
            Ok(TransitionOutcome::Applied {
                name: transition.name.clone(),
            })
        }
        None => Ok(TransitionOutcome::Unavailable {
            available: transitions.into_iter().map(|t| t.name).collect(),
        }),
    }
}
