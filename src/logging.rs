use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

pub const DEFAULT_FILTER: &str = "nba_mvp=info,warn";
pub const LOG_FILE: &str = "nba-mvp.log";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Sends tracing output to `<dir>/nba-mvp.log`; the dashboard owns the terminal.
pub fn init_file_tracing(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log dir {}", dir.display()))?;
    let log_file = std::fs::File::create(dir.join(LOG_FILE))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

/// Warnings and above on stderr, for command-line tools whose stdout is data.
pub fn init_stderr_tracing() -> anyhow::Result<()> {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}
