//! Subscriber setup for the replay harness.
//!
//! `replay` logs to stderr; `live` logs to a file by default so the stdout
//! transition stream stays machine-readable. `VIBE_LOG_DIR` forces file
//! logging for either mode, `VIBE_DEBUG_LOG=1` forces the debug level.

use std::env;
use std::path::PathBuf;

use fs_err as fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "vibe-replay.log";

/// Initializes the global subscriber. Returns the appender guard when file
/// logging is active; the caller holds it for the process lifetime.
pub fn init(prefer_file: bool) -> Option<WorkerGuard> {
    let debug_enabled = env::var("VIBE_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    if let Some(dir) = log_dir(prefer_file) {
        if fs::create_dir_all(&dir).is_ok() {
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            return Some(guard);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    None
}

fn log_dir(prefer_file: bool) -> Option<PathBuf> {
    if let Ok(dir) = env::var("VIBE_LOG_DIR") {
        return Some(PathBuf::from(dir));
    }
    if prefer_file {
        return dirs::home_dir().map(|home| home.join(".vibe").join("logs"));
    }
    None
}
