use crate::error::{Result, TimerError};
use tracing::Level;

const LEVEL_NAMES: [(&str, Level); 6] = [
    ("TRACE", Level::TRACE),
    ("DEBUG", Level::DEBUG),
    ("INFO", Level::INFO),
    ("WARN", Level::WARN),
    ("WARNING", Level::WARN),
    ("ERROR", Level::ERROR),
];

/// Parse a level name, ignoring case and surrounding whitespace
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    let name = level_str.trim();
    LEVEL_NAMES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, level)| *level)
        .ok_or_else(|| TimerError::config(format!("Invalid log level: {level_str}")))
}

/// The more verbose of two levels (`tracing` orders TRACE highest)
pub fn more_verbose(a: Level, b: Level) -> Level {
    a.max(b)
}
