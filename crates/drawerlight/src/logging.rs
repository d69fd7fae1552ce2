//! Logging configuration for drawerlight.
//!
//! Sets up the `tracing` subscriber. One-shot commands log to standard error;
//! the interactive screen logs to a file so lines do not land on top of it.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much to log, picked from `-q` and `-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above, including every command sent (`-v`).
    Verbose,
    /// Everything, including handshake lines (`-vv`).
    Trace,
}

impl Verbosity {
    /// Most detailed level that gets through.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }
}

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogTarget {
    /// Standard error, for one-shot commands.
    #[default]
    Stderr,
    /// Append to a file, for when the terminal UI owns the screen.
    File(PathBuf),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `verbosity` when set. If the log file cannot be
/// opened, lines go to standard error instead. Calling this twice is harmless;
/// the second call does nothing.
///
/// # Examples
///
/// ```no_run
/// use drawerlight::{init_logging, logging::{LogTarget, Verbosity}};
///
/// init_logging(Verbosity::Normal, &LogTarget::Stderr);
/// ```
pub fn init_logging(verbosity: Verbosity, target: &LogTarget) {
    let default_filter = format!("drawerlight={}", verbosity.to_level_filter());

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let file = match target {
        LogTarget::Stderr => None,
        LogTarget::File(path) => open_log_file(path),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    // A subscriber may already be installed by an earlier call.
    let _ = match file {
        Some(file) => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
            .try_init(),
        None => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return None;
        }
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Route warnings from code under test to the test harness output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_grow_with_verbosity() {
        let levels: Vec<Level> = [
            Verbosity::Quiet,
            Verbosity::Normal,
            Verbosity::Verbose,
            Verbosity::Trace,
        ]
        .iter()
        .map(Verbosity::to_level_filter)
        .collect();
        assert_eq!(
            levels,
            vec![Level::ERROR, Level::INFO, Level::DEBUG, Level::TRACE]
        );
        assert_eq!(Verbosity::default().to_level_filter(), Level::INFO);
    }

    #[test]
    fn test_log_target_default() {
        assert_eq!(LogTarget::default(), LogTarget::Stderr);
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("drawerlight.log");

        assert!(open_log_file(&path).is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_init_logging_twice() {
        // Only the first call installs a subscriber; later calls are ignored.
        init_logging(Verbosity::Normal, &LogTarget::Stderr);
        init_logging(Verbosity::Trace, &LogTarget::Stderr);
    }
}
