#![forbid(unsafe_code)]

//! `tracker-intercom`: Slack-to-issue-tracker bridge binary.
//!
//! Bootstraps configuration, starts the health endpoint, and runs the
//! supervised Slack Socket Mode event loop.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use tracker_intercom::config::GlobalConfig;
use tracker_intercom::health::{self, ConnectionStatus};
use tracker_intercom::slack::client::{self, SlackService};
use tracker_intercom::state::AppState;
use tracker_intercom::summarizer::SummarizerClient;
use tracker_intercom::tracker::client::TrackerClient;
use tracker_intercom::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tracker-intercom", about = "Slack-to-issue-tracker bridge", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("tracker-intercom bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    config.load_credentials().await?;

    if config.tracker.parent_key.is_none() {
        // Once at startup, not per creation.
        warn!("tracker.parent_key not set; tickets will be created at the top level of the project");
    }
    if config.summarizer.is_none() {
        info!("summarizer not configured; thread summaries are disabled");
    }

    let config = Arc::new(config);
    info!(
        channels = config.include_channels.len(),
        users = config.include_users.len(),
        project = %config.tracker.project_key,
        "configuration loaded"
    );

    // ── Build shared application state ──────────────────
    let slack = SlackService::new(&config.slack)?;
    let tracker = TrackerClient::new(&config.tracker);
    let summarizer = config.summarizer.as_ref().map(SummarizerClient::new);
    let connection = ConnectionStatus::default();

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        slack,
        tracker,
        summarizer,
        connection: connection.clone(),
    });

    // ── Start health endpoint ───────────────────────────
    let ct = CancellationToken::new();
    let health_ct = ct.clone();
    let health_handle = tokio::spawn(async move {
        if let Err(err) = health::serve_health(config.http_port, connection, health_ct).await {
            error!(%err, "health endpoint failed");
        }
    });

    // ── Run the supervised event loop ───────────────────
    let loop_state = Arc::clone(&state);
    let loop_ct = ct.clone();
    let loop_handle = tokio::spawn(async move {
        client::run_supervised(loop_state, loop_ct).await;
    });

    info!("tracker-intercom ready");

    // ── Wait for shutdown signal ────────────────────────
    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    let _ = tokio::join!(loop_handle, health_handle);
    info!("tracker-intercom shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
