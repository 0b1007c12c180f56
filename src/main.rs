//! RetroDash - a retro terminal productivity dashboard
//!
//! One screen with three panels:
//! - a todo list
//! - a Pomodoro timer (25 minutes of work, 5 minutes of break)
//! - a mocked weather lookup
//!
//! Takes no arguments. Press `?` inside the dashboard for shortcuts.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use retrodash::dashboard::runtime;
use retrodash::types::constants::LOG_FILE_NAME;
use retrodash::{default_sink, Storage, TimerConfig};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let storage = Storage::open_default();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(storage.dir());

    if let Err(e) = execute(storage).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber, writing to a log file in `log_dir`.
///
/// Logging is skipped if the file cannot be created.
fn init_tracing(log_dir: &Path) -> Option<WorkerGuard> {
    use tracing_subscriber::{fmt, EnvFilter};

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)
        .ok()?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .ok()?;

    Some(guard)
}

/// Runs the dashboard with the default timer configuration.
async fn execute(storage: Storage) -> Result<()> {
    tracing::info!(data_dir = %storage.dir().display(), "Starting RetroDash");

    let sink = default_sink();
    runtime::run(TimerConfig::default(), storage, sink)
        .await
        .context("dashboard terminated")
}
