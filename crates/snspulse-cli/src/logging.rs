//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level when set.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File written under the configured log directory by `poll`.
pub(crate) const LOG_FILE_NAME: &str = "poller.log";

fn env_filter(default_level: &str) -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?)
}

/// Console-only logging, for the short-lived read commands.
///
/// # Errors
///
/// Returns an error if the level directive is invalid or a global subscriber
/// is already installed.
pub(crate) fn init_console(default_level: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(env_filter(default_level)?)
        .with(fmt::layer().with_target(false))
        .try_init()?;
    Ok(())
}

/// Console plus an appending log file at `log_dir/poller.log`.
///
/// The returned guard flushes the file writer on drop; hold it for the life
/// of the process.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the file cannot be
/// opened, the level directive is invalid, or a subscriber is already set.
pub(crate) fn init_with_file(default_level: &str, log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter(default_level)?)
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .try_init()?;

    Ok(guard)
}
