mod cli;
mod tui;

pub(crate) use cli::{as_cli, expand_home, Cli};
pub(crate) use tui::as_tui;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Overrides the default filter, e.g. `CLIPFILTER_LOG=clipfilter=trace`.
pub(crate) const LOG_ENV: &str = "CLIPFILTER_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr for one-shot commands. Quiet unless `verbose`.
pub(crate) fn init_logging(verbose: bool) {
    let level = if verbose {
        "clipfilter=debug"
    } else {
        "clipfilter=warn"
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(env_filter(level))
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

/// Log to a file while the terminal UI owns the screen.
pub(crate) fn init_file_logging(path: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let level = if verbose {
        "clipfilter=debug"
    } else {
        "clipfilter=info"
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(env_filter(level))
        .try_init();

    debug!(path = %path.display(), "Logging initialized at level: {}", level);
    Ok(())
}
