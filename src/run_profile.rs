//! Appliance run-profile correction
//!
//! The appliance's delay timer only takes whole hours, and its cycle (about
//! 90 minutes) draws most of its energy in the first ~45 minutes. When the
//! recommendation is computed late in the hour, the timer's "N hours from now"
//! lands well inside the cheap slot and the heavy part of the run spills into
//! the following hour. Starting one hour earlier keeps the heavy part inside
//! the cheap slot.

use serde::{Deserialize, Serialize};

/// Default minute after which the start is pulled forward by one hour
pub const DEFAULT_LATE_START_MINUTE: u32 = 40;

/// Run-profile parameters for the appliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProfile {
    /// Minutes past the hour beyond which the offset is reduced by one (0-59)
    pub late_start_minute: u32,
}

impl Default for RunProfile {
    fn default() -> Self {
        Self {
            late_start_minute: DEFAULT_LATE_START_MINUTE,
        }
    }
}

impl RunProfile {
    pub const fn new(late_start_minute: u32) -> Self {
        Self { late_start_minute }
    }

    /// Correct a raw hour offset for the current minute of the hour
    pub const fn correct(&self, offset: i64, minute_of_hour: u32) -> i64 {
        if minute_of_hour > self.late_start_minute {
            offset - 1
        } else {
            offset
        }
    }
}

/// [`RunProfile::correct`] with the default threshold
pub const fn correct_for_running_hour(offset: i64, minute_of_hour: u32) -> i64 {
    RunProfile::new(DEFAULT_LATE_START_MINUTE).correct(offset, minute_of_hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_at_forty_minutes() {
        assert_eq!(correct_for_running_hour(5, 40), 5);
        assert_eq!(correct_for_running_hour(5, 41), 4);
    }

    #[test]
    fn start_of_hour_is_unchanged() {
        assert_eq!(correct_for_running_hour(3, 0), 3);
        assert_eq!(correct_for_running_hour(3, 59), 2);
    }

    #[test]
    fn zero_offset_can_go_negative() {
        assert_eq!(correct_for_running_hour(0, 45), -1);
    }

    #[test]
    fn custom_threshold() {
        let profile = RunProfile::new(30);
        assert_eq!(profile.correct(7, 30), 7);
        assert_eq!(profile.correct(7, 31), 6);
    }
}
