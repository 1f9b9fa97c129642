use std::io;
use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Log file written inside the task directory unless `--log` says otherwise
pub const LOG_FILE: &str = "tasklane.log";

const ROTATE_AT_LINES: usize = 1000;
const KEEP_LINES: usize = 750;

/// Trim the log file to its most recent lines once it grows too long
pub fn rotate_log(path: &Path) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= ROTATE_AT_LINES {
        return;
    }
    let trimmed = lines[lines.len() - KEEP_LINES..].join("\n");
    let _ = std::fs::write(path, format!("{}\n", trimmed));
}

/// File-based logging so the terminal UI is never written over.
///
/// Default level: DEBUG for tasklane, WARN for dependencies; `RUST_LOG`
/// overrides it.
pub fn setup_logging(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tasklane=debug,warn"));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::debug!("logging initialized, writing to {}", path.display());
    Ok(())
}
