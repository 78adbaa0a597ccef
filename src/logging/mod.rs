//! Tracing subscriber initialization.
//!
//! The library itself only emits `tracing` events; a host that wants them
//! on disk calls [`init`] (or [`init_from_config`]) once at startup. Logs
//! go to a file so the host UI's output stays clean; monitor with
//! `tail -f`. `RUST_LOG` controls the filter, defaulting to "info".

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ResolvedConfig;

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Log path is missing a filename or a parent directory
    #[error("Log path cannot hold a log file: {0:?}")]
    UnusablePath(PathBuf),

    /// Tracing subscriber already initialized
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Split a log path into (directory, file name), creating the directory.
fn prepare_log_location(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::UnusablePath(log_path.to_path_buf()))?;

    Ok((directory, file_name))
}

/// Initialize the tracing subscriber with file-based logging.
///
/// # Errors
///
/// Returns `LoggingError` if the subscriber was already initialized, the
/// path has no filename, or the log directory could not be created.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let (directory, file_name) = prepare_log_location(log_path)?;
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false) // No ANSI colors in log files
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

/// Initialize logging at the path the resolved configuration names.
pub fn init_from_config(config: &ResolvedConfig) -> Result<(), LoggingError> {
    init(&config.log_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial(tracing_init)]
    fn init_creates_log_directory_if_missing() {
        let test_dir = std::env::temp_dir().join("chatdeck_test_logs_create");
        let log_file = test_dir.join("test.log");
        let _ = fs::remove_dir_all(&test_dir);

        // May fail if another test installed the subscriber first; the
        // directory is created either way.
        let _ = init(&log_file);

        assert!(
            test_dir.exists(),
            "Log directory should be created: {test_dir:?}"
        );

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn init_succeeds_when_directory_already_exists() {
        let test_dir = std::env::temp_dir().join("chatdeck_test_logs_exists");
        let log_file = test_dir.join("test.log");
        let _ = fs::create_dir_all(&test_dir);

        let _ = init(&log_file);

        assert!(test_dir.exists(), "Log directory should exist: {test_dir:?}");

        let _ = fs::remove_dir_all(&test_dir);
    }

    #[test]
    fn bare_file_name_resolves_to_current_directory() {
        let (directory, file_name) =
            prepare_log_location(Path::new("chatdeck.log")).expect("usable location");
        assert_eq!(directory, Path::new("."));
        assert_eq!(file_name, "chatdeck.log");
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let err = prepare_log_location(Path::new("/")).expect_err("no file name component");
        assert!(matches!(err, LoggingError::UnusablePath(_)));
    }
}
