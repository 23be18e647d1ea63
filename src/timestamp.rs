//! Timestamp parsing and whole-hour arithmetic
//!
//! Tibber reports slot starts as RFC 3339 text with a local offset
//! (`2024-01-01T11:00:00.000+01:00`). Everything here works on the UTC
//! instant behind that text, so two samples compare chronologically even when
//! their offsets differ across a DST switch.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimerError};

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;
/// Fixed-width month: 30 days
const SECONDS_PER_MONTH: i64 = 2_592_000;
/// Fixed-width year: 12 months of 30 days
const SECONDS_PER_YEAR: i64 = 31_104_000;

/// An absolute instant in UTC, parsed from RFC 3339 text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse `2024-01-01T10:00:00Z` style text.
    ///
    /// Fractional seconds and numeric offsets are accepted and normalized to
    /// UTC. Anything else, including out-of-range components such as month 13
    /// or hour 25, is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TimerError::timestamp(text, "empty timestamp"));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| TimerError::timestamp(text, e.to_string()))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Seconds since the origin of the 30-day-month, 360-day-year calendar
    pub fn fixed_width_seconds(&self) -> i64 {
        i64::from(self.second())
            + i64::from(self.minute()) * SECONDS_PER_MINUTE
            + i64::from(self.hour()) * SECONDS_PER_HOUR
            + i64::from(self.day()) * SECONDS_PER_DAY
            + i64::from(self.month()) * SECONDS_PER_MONTH
            + i64::from(self.year()) * SECONDS_PER_YEAR
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl FromStr for Timestamp {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Timestamp {
    type Error = TimerError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Timestamp> for String {
    fn from(value: Timestamp) -> Self {
        value.to_string()
    }
}

/// How the distance between two timestamps is turned into hours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourArithmetic {
    /// Real elapsed time between the two instants
    #[default]
    Calendar,
    /// Every month 30 days, every year 360 days. Only agrees with
    /// [`HourArithmetic::Calendar`] when no 31-day month end or end of
    /// February lies between the two timestamps.
    FixedWidth,
}

impl HourArithmetic {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "calendar",
            Self::FixedWidth => "fixed_width",
        }
    }
}

/// Signed whole hours from `start` to `end`, truncated toward zero
pub fn hours_between(start: &Timestamp, end: &Timestamp, mode: HourArithmetic) -> i64 {
    let diff_seconds = match mode {
        HourArithmetic::Calendar => (end.0 - start.0).num_seconds(),
        HourArithmetic::FixedWidth => end.fixed_width_seconds() - start.fixed_width_seconds(),
    };
    // Integer division on i64 truncates toward zero
    diff_seconds / SECONDS_PER_HOUR
}
