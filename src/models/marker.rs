//! Reaction markers on the thread root.

use crate::models::command::Command;

/// Visible reaction on the thread's root message indicating the
/// command-derived status. At most one marker is visible at a time;
/// setting a new one first clears the others (best-effort).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Work has started (or restarted).
    InProgress,
    /// The ticket was completed.
    Done,
    /// The ticket was canceled.
    Canceled,
}

impl Marker {
    /// All markers this system manages on a thread root.
    pub const ALL: [Self; 3] = [Self::InProgress, Self::Done, Self::Canceled];

    /// Slack reaction name for this marker.
    #[must_use]
    pub fn reaction_name(self) -> &'static str {
        match self {
            Self::InProgress => "hourglass_flowing_sand",
            Self::Done => "white_check_mark",
            Self::Canceled => "x",
        }
    }

    /// Reverse lookup used when clearing existing markers.
    #[must_use]
    pub fn from_reaction_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.reaction_name() == name)
    }

    /// Marker implied by a successfully applied command, if any.
    #[must_use]
    pub fn for_command(command: &Command) -> Option<Self> {
        match command {
            Command::Start | Command::Restart => Some(Self::InProgress),
            Command::Done => Some(Self::Done),
            Command::Cancel => Some(Self::Canceled),
            Command::Create | Command::Invalid(_) => None,
        }
    }
}
