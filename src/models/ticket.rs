//! Ticket key newtype.

use std::fmt::{Display, Formatter};

/// A ticket key in the tracker, e.g. `SUP-42`.
///
/// Not a stored entity: keys are recovered lazily by scanning thread
/// history for the bot's own creation announcement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TicketKey(pub String);

impl TicketKey {
    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TicketKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
