//! Logging setup for the monitor.
//!
//! - Writes to the configured log file (cleared on each start)
//! - Optionally mirrors to stderr; stdout is reserved for the delta stream
//! - Filter from `RUST_LOG`, else `info` (or `debug` when asked)

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// Creates the log directory if needed and truncates any previous log.
///
/// # Errors
///
/// Fails if the log file cannot be prepared or a subscriber is already
/// installed.
pub fn init_logging(
    log_file: &Path,
    console_enabled: bool,
    debug: bool,
) -> Result<LoggingGuard, io::Error> {
    let (log_dir, file_name) = split_log_path(log_file)?;
    fs::create_dir_all(log_dir)?;
    fs::write(log_file, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let console_layer = console_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn env_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}

fn split_log_path(log_file: &Path) -> Result<(&Path, &std::ffi::OsStr), io::Error> {
    let file_name = log_file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path '{}' has no file name", log_file.display()),
        )
    })?;
    let dir = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // The global subscriber can only be installed once per process, so these
    // tests cover path handling only.

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/dishwatch.log")).unwrap();
        assert_eq!(dir, Path::new("/var/log"));
        assert_eq!(name, "dishwatch.log");
    }

    #[test]
    fn test_bare_file_name_uses_current_dir() {
        let (dir, name) = split_log_path(Path::new("dishwatch.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "dishwatch.log");
    }

    #[test]
    fn test_path_without_file_name() {
        let err = split_log_path(&PathBuf::from("/")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
