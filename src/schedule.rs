//! Start-offset computation from a price timeline
//!
//! Pure composition of selection, hour arithmetic and run-profile
//! correction. No I/O and no clock access: the minute of the hour is passed in.

use crate::run_profile::RunProfile;
use crate::selector::{Selection, select_cheapest};
use crate::timeline::PriceTimeline;
use crate::timestamp::{HourArithmetic, hours_between};

/// Knobs for [`compute_schedule`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleOptions {
    pub arithmetic: HourArithmetic,
    pub run_profile: RunProfile,
}

/// A recommended delay-timer setting
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub selection: Selection,
    /// Whole hours from the current slot to the cheapest slot
    pub raw_offset: i64,
    pub minute_of_hour: u32,
    /// Hours to set on the appliance timer. May be negative.
    pub offset: i64,
}

/// Result of one scheduling pass
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleOutcome {
    Recommended(Recommendation),
    /// No upcoming slot; there is no offset to report
    NoCandidate,
}

impl ScheduleOutcome {
    pub const fn offset(&self) -> Option<i64> {
        match self {
            Self::Recommended(rec) => Some(rec.offset),
            Self::NoCandidate => None,
        }
    }

    pub const fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            Self::Recommended(rec) => Some(rec),
            Self::NoCandidate => None,
        }
    }
}

/// Compute the corrected start offset for `timeline`
pub fn compute_schedule(
    timeline: &PriceTimeline,
    minute_of_hour: u32,
    options: &ScheduleOptions,
) -> ScheduleOutcome {
    let Some(selection) = select_cheapest(timeline) else {
        return ScheduleOutcome::NoCandidate;
    };
    let raw_offset = hours_between(
        timeline.now(),
        &selection.sample.starts_at,
        options.arithmetic,
    );
    let offset = options.run_profile.correct(raw_offset, minute_of_hour);
    ScheduleOutcome::Recommended(Recommendation {
        selection,
        raw_offset,
        minute_of_hour,
        offset,
    })
}
