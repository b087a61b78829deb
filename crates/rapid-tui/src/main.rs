//! `rapid-tui`: live terminal dashboard for RAPID-100 emergency calls.
//!
//! Connects to the dispatch backend's live feed, folds its events into
//! call state via `rapid-core`, and renders the operator view: call
//! status, transcript, incident type/severity, and the derived summary.
//!
//! Logs go to a file (default `/tmp/rapid-tui.log`) to avoid corrupting
//! the terminal UI.

mod app;
mod event;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use rapid_core::{CallWatcher, FeedConfig};

use crate::app::App;

/// Live terminal dashboard for RAPID-100 emergency-call monitoring.
#[derive(Parser, Debug)]
#[command(name = "rapid-tui", version, about)]
struct Cli {
    /// Dispatch backend host
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "RAPID_HOST")]
    host: String,

    /// Dispatch backend port
    #[arg(short = 'p', long, default_value_t = rapid_core::FEED_PORT, env = "RAPID_PORT")]
    port: u16,

    /// Use the secure streaming scheme (wss)
    #[arg(long, env = "RAPID_SECURE")]
    secure: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/rapid-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr, that
/// would corrupt the TUI. Returns a guard that must be held for the
/// lifetime of the application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rapid_tui={log_level},rapid_core={log_level},rapid_feed={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("rapid-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = setup_tracing(&cli);
    tui::install_hooks()?;

    let config = FeedConfig {
        host: cli.host.clone(),
        port: cli.port,
        secure: cli.secure,
        ..FeedConfig::default()
    };
    info!(host = %config.host, port = config.port, "starting dashboard");

    let watcher = CallWatcher::new(config);
    App::new().run(&watcher).await
}
