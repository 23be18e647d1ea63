//! Structured logging and tracing for Tibber Timer
//!
//! Console and daily-rolling file output through `tracing-subscriber`, plus a
//! small component-tagged logger used throughout the crate.

use crate::config::LoggingConfig;
use crate::error::{Result, TimerError};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Once;
use tracing::{Level, info};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod level;
mod structured;

pub use level::{more_verbose, parse_log_level};
pub use structured::{LogContext, StructuredLogger, get_logger, get_logger_with_context};

/// Environment variable that forces console-only logging
pub const DISABLE_FILE_LOG_ENV: &str = "TIBBER_TIMER_DISABLE_FILE_LOG";

const DEFAULT_FILE_PREFIX: &str = "tibber-timer";

// Flushes buffered file output on drop, so it lives as long as the process
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static INIT_ONCE: Once = Once::new();
static INIT_ERROR: OnceCell<String> = OnceCell::new();

/// Install the global subscriber once; later calls return the first outcome
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT_ONCE.call_once(|| {
        if let Err(e) = install_subscriber(config) {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    match INIT_ERROR.get() {
        Some(err) => Err(TimerError::config(err.clone())),
        None => Ok(()),
    }
}

/// Console and file levels, each falling back to `level`
fn resolve_levels(config: &LoggingConfig) -> Result<(Level, Level)> {
    let base = parse_log_level(&config.level)?;
    let override_or_base = |value: Option<&String>| {
        value
            .and_then(|s| parse_log_level(s).ok())
            .unwrap_or(base)
    };
    Ok((
        override_or_base(config.console_level.as_ref()),
        override_or_base(config.file_level.as_ref()),
    ))
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("tibber_timer={level},reqwest=warn,hyper=warn").into())
}

fn console_only() -> bool {
    cfg!(test) || std::env::var_os(DISABLE_FILE_LOG_ENV).is_some()
}

/// Split `file` into the appender directory and file-name prefix
fn log_location(file: &str) -> (&Path, &str) {
    let path = Path::new(file);
    if path.extension().is_none() {
        return (path, DEFAULT_FILE_PREFIX);
    }
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_FILE_PREFIX);
    (directory, prefix)
}

fn open_file_writer(config: &LoggingConfig) -> Result<NonBlocking> {
    let (directory, prefix) = log_location(&config.file);
    let appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(usize::try_from(config.backup_count.max(1)).unwrap_or(1))
        .build(directory)
        .map_err(|e| TimerError::io(format!("Failed to create log file appender: {e}")))?;

    let (writer, guard) = non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(writer)
}

fn install_subscriber(config: &LoggingConfig) -> Result<()> {
    let (console_level, file_level) = resolve_levels(config)?;
    let filter = build_env_filter(more_verbose(console_level, file_level));

    let file_writer = if console_only() {
        None
    } else {
        Some(open_file_writer(config)?)
    };
    let to_file = file_writer.is_some();
    // Console-only mode ignores `console_output` so output is never lost
    let to_console = config.console_output || !to_file;

    let file_layer = file_writer.map(|writer| {
        let base = fmt::layer()
            .with_writer(writer)
            .with_target(false)
            .with_ansi(false);
        let level_filter = LevelFilter::from_level(file_level);
        if config.json_format {
            base.json().with_filter(level_filter).boxed()
        } else {
            base.with_filter(level_filter).boxed()
        }
    });

    let console_layer = to_console.then(|| {
        let base = fmt::layer().with_writer(std::io::stdout).with_target(false);
        let level_filter = LevelFilter::from_level(console_level);
        if config.json_format {
            base.json().with_filter(level_filter).boxed()
        } else {
            base.with_filter(level_filter).boxed()
        }
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    match installed {
        Ok(()) if to_file => {
            info!(
                "Logging initialized - console_level: {:?}, file_level: {:?}, file: {}",
                console_level, file_level, config.file
            );
            Ok(())
        }
        Ok(()) => {
            info!("Logging initialized - console_level: {:?}, console-only", console_level);
            Ok(())
        }
        // A test harness may already own the global subscriber
        Err(_) if !to_file => Ok(()),
        Err(e) => Err(TimerError::config(format!(
            "Failed to install log subscriber: {e}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let config = LoggingConfig::default();
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_resolve_levels_falls_back_to_base() {
        let mut config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(resolve_levels(&config).unwrap(), (Level::WARN, Level::WARN));

        config.console_level = Some("debug".to_string());
        config.file_level = Some("bogus".to_string());
        assert_eq!(resolve_levels(&config).unwrap(), (Level::DEBUG, Level::WARN));

        config.level = "loud".to_string();
        assert!(resolve_levels(&config).is_err());
    }

    #[test]
    fn test_log_location() {
        assert_eq!(
            log_location("/var/log/tibber.log"),
            (Path::new("/var/log"), "tibber")
        );
        assert_eq!(log_location("timer.log"), (Path::new("."), "timer"));
        assert_eq!(
            log_location("/var/log/timer"),
            (Path::new("/var/log/timer"), DEFAULT_FILE_PREFIX)
        );
    }

    #[test]
    fn test_structured_logger_without_panicking() {
        init_logging(&LoggingConfig::default()).ok();

        let logger = StructuredLogger::new(
            LogContext::new("test_component").with_field("key", "value".to_string()),
        );
        logger.info("Test info message");
        logger.debug("Test debug message");
        logger.warn("Test warning message");
        logger.error("Test error message");
    }
}
