//! Mention command vocabulary and parsing.

/// A command extracted from a mention's text.
///
/// The vocabulary is fixed; anything else is [`Command::Invalid`] with the
/// original token preserved for the user-facing rejection reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the ticket to "In Progress" and assign it to the requester.
    Start,
    /// Move the ticket to "Done", archive the thread, optionally summarize.
    Done,
    /// Move the ticket to "Canceled".
    Cancel,
    /// Move the ticket back to "To Do".
    Restart,
    /// Create a fresh ticket for this thread.
    Create,
    /// Unrecognized token, kept verbatim.
    Invalid(String),
}

/// The recognized command tokens, in the order echoed back to users.
pub const VALID_COMMANDS: [&str; 5] = ["start", "done", "cancel", "restart", "create"];

impl Command {
    /// Parse a command out of a mention's text.
    ///
    /// Strips the leading `<@UXXXX>` mention markup (everything through the
    /// first `>`), trims whitespace, and lowercases before matching.
    #[must_use]
    pub fn parse(mention_text: &str) -> Self {
        let token = mention_text
            .split_once('>')
            .map_or(mention_text, |(_, rest)| rest)
            .trim();

        match token.to_lowercase().as_str() {
            "start" => Self::Start,
            "done" => Self::Done,
            "cancel" => Self::Cancel,
            "restart" => Self::Restart,
            "create" => Self::Create,
            _ => Self::Invalid(token.to_owned()),
        }
    }

    /// Target lifecycle state name for state-changing commands.
    ///
    /// `Create` and `Invalid` carry no target state.
    #[must_use]
    pub fn target_state(&self) -> Option<&'static str> {
        match self {
            Self::Start => Some("In Progress"),
            Self::Done => Some("Done"),
            Self::Cancel => Some("Canceled"),
            Self::Restart => Some("To Do"),
            Self::Create | Self::Invalid(_) => None,
        }
    }
}
