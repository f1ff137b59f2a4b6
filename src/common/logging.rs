//! Logging and tracing configuration
//!
//! Scenario progress goes to stderr so that the report on stdout stays
//! machine-readable with `--json`. A plain-text copy can also be appended
//! to a log file to keep a record of each run.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Default filter: INFO for this crate, WARN for dependencies
const DEFAULT_FILTER: &str = "bridge_e2e=info,warn";

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable. When
/// `log_file` is given, events are also appended to that file with full
/// detail. Returns the log file actually opened, if any.
pub fn init_cli(log_file: Option<&Path>) -> Option<PathBuf> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    if let Some(path) = log_file {
        match open_log_file(path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);

                tracing_subscriber::registry()
                    .with(filter)
                    .with(stderr_layer)
                    .with(file_layer)
                    .init();

                return Some(path.to_path_buf());
            }
            Err(e) => {
                eprintln!("Warning: Could not open log file {}: {}", path.display(), e);
            }
        }
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    None
}

/// Open `path` for appending, creating missing parent directories
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("cannot create directory {}: {}", dir.display(), e),
            )
        })?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Default location for a run log
pub fn default_log_path() -> Option<PathBuf> {
    paths::log_dir().map(|d| d.join("bridge-e2e.log"))
}
