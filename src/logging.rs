//! Log setup.
//!
//! The terminal belongs to the table, so logs go to a file. Filtering follows
//! `RUST_LOG` and defaults to `info`, e.g. `RUST_LOG=recview=trace`.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::TableError;

pub const DEFAULT_LOG_FILE: &str = "recview.log";

/// Splits a log file path into the directory and file name for the appender.
fn split_log_path(log_file: Option<&Path>) -> (PathBuf, String) {
    let path = match log_file {
        Some(p) => p.to_path_buf(),
        None => std::env::temp_dir().join(DEFAULT_LOG_FILE),
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_LOG_FILE)
        .to_string();
    (dir, name)
}

fn file_appender(log_file: Option<&Path>) -> Result<RollingFileAppender, TableError> {
    let (dir, name) = split_log_path(log_file);
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(&dir)
        .map_err(|e| TableError::LoadingFailed(format!("{}: {e}", dir.display())))
}

/// Installs the global subscriber. Without a usable log file the table
/// still runs, only unlogged.
pub fn init(log_file: Option<&Path>) {
    let file_layer = match file_appender(log_file) {
        Ok(appender) => Some(
            fmt::layer()
                .with_writer(appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                ),
        ),
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {e}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .init();
}
