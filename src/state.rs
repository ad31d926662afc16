//! Shared application state passed into each handler invocation.

use std::sync::Arc;

use crate::config::GlobalConfig;
use crate::health::ConnectionStatus;
use crate::slack::client::SlackService;
use crate::summarizer::{Summarize, SummarizerClient};
use crate::tracker::client::TrackerClient;

/// Constructed-once client handles shared by all event handlers.
///
/// Holds no per-thread mutable state: correlation is recomputed from the
/// platform's history on every invocation, so a restarted event loop
/// rebuilds everything it needs from durable history.
pub struct AppState {
    /// Validated configuration.
    pub config: Arc<GlobalConfig>,
    /// Slack Web API + Socket Mode client.
    pub slack: SlackService,
    /// Issue tracker REST client.
    pub tracker: TrackerClient,
    /// Summarizer client, when configured.
    pub summarizer: Option<SummarizerClient>,
    /// Event-source liveness flag surfaced by the health endpoint.
    pub connection: ConnectionStatus,
}

impl AppState {
    /// The summarizer seam as a trait object, when configured.
    #[must_use]
    pub fn summarizer_seam(&self) -> Option<&dyn Summarize> {
        self.summarizer.as_ref().map(|s| s as &dyn Summarize)
    }
}
