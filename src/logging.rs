//! Tracing subscriber setup.
//!
//! CLI commands log to stderr so stdout stays clean for reports. The TUI owns
//! the terminal, so its logs go to `mkt.log` in the system temp directory.
//! `RUST_LOG` overrides the default level when set.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Where the TUI writes its log.
pub fn tui_log_path() -> PathBuf {
    std::env::temp_dir().join("mkt.log")
}

fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Notice shown when the TUI cannot open its log file.
pub fn log_file_notice(path: &Path, err: &io::Error) -> String {
    format!("logging disabled: cannot open {}: {err}", path.display())
}

/// Install the global subscriber. Calling it twice is harmless.
///
/// Returns a notice for the TUI status line when its log file cannot be
/// opened; the TUI then runs without logging.
pub fn init(verbose: bool, tui: bool) -> Option<String> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    if tui {
        let path = tui_log_path();
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
                tracing::info!(log_file = ?path, "logging initialized");
                None
            }
            // Writing to stderr would draw over the screen.
            Err(e) => Some(log_file_notice(&path, &e)),
        }
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
        None
    }
}
