//! Cheapest upcoming slot selection
//!
//! Today's samples only count when they start strictly after the feed's
//! current marker; tomorrow's samples are all in the future by construction
//! and are taken unfiltered. Ties keep the first sample seen, scanning today
//! before tomorrow.

use crate::logging::get_logger;
use crate::timeline::{Day, PriceSample, PriceTimeline};

/// The winning slot and where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub sample: PriceSample,
    pub day: Day,
    pub index: usize,
}

impl Selection {
    pub const fn total(&self) -> f64 {
        self.sample.total
    }
}

/// Find the lowest-priced sample that starts after "now".
///
/// Returns `None` when no sample qualifies. The outcome is logged.
pub fn select_cheapest(timeline: &PriceTimeline) -> Option<Selection> {
    let logger = get_logger("selector");
    let now = timeline.now();

    let mut best: Option<Selection> = None;
    let mut consider = |day: Day, index: usize, sample: &PriceSample| {
        // NaN never compares less, so it can never win
        let cheaper = best
            .as_ref()
            .map_or(sample.total.is_finite(), |b| sample.total < b.total());
        if cheaper {
            best = Some(Selection {
                sample: sample.clone(),
                day,
                index,
            });
        }
    };

    for (index, sample) in timeline.today.iter().enumerate() {
        if sample.starts_at > *now {
            consider(Day::Today, index, sample);
        }
    }
    for (index, sample) in timeline.tomorrow.iter().enumerate() {
        consider(Day::Tomorrow, index, sample);
    }

    match &best {
        Some(sel) => logger.info(&format!(
            "Cheapest slot: {} ({}[{}]) total={:.4}",
            sel.sample.starts_at,
            sel.day.as_str(),
            sel.index,
            sel.total()
        )),
        None => logger.warn(&format!(
            "No price slot after {} (today={}, tomorrow={})",
            now,
            timeline.today.len(),
            timeline.tomorrow.len()
        )),
    }
    best
}
