use std::path::PathBuf;

use clap::Parser;
use tasklane::cli::commands::Cli;
use tasklane::cli::handlers;
use tasklane::logging;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            if let Err(e) = launch_tui(&cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn launch_tui(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let dir = handlers::task_dir(cli.dir.as_deref())?;
    let log_path = cli
        .log
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| dir.join(logging::LOG_FILE));
    logging::rotate_log(&log_path);
    if let Err(e) = logging::setup_logging(&log_path) {
        eprintln!("warning: logging disabled: {}", e);
    }
    tasklane::tui::run(&dir)
}
