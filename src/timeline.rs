//! Price timeline data model
//!
//! A [`PriceTimeline`] is built fresh from every poll response, read by one
//! selection pass and then dropped. Nothing in here is mutated after
//! construction.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimerError};
use crate::timestamp::Timestamp;

/// Tibber price level label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum PriceLevel {
    VeryCheap,
    Cheap,
    #[default]
    Normal,
    Expensive,
    VeryExpensive,
}

impl From<String> for PriceLevel {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl PriceLevel {
    pub fn from_label(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "VERY_CHEAP" => Self::VeryCheap,
            "CHEAP" => Self::Cheap,
            "EXPENSIVE" => Self::Expensive,
            "VERY_EXPENSIVE" => Self::VeryExpensive,
            _ => Self::Normal,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VeryCheap => "VERY_CHEAP",
            Self::Cheap => "CHEAP",
            Self::Normal => "NORMAL",
            Self::Expensive => "EXPENSIVE",
            Self::VeryExpensive => "VERY_EXPENSIVE",
        }
    }
}

/// One hourly price slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub starts_at: Timestamp,
    /// Total price including taxes, per kWh
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<PriceLevel>,
}

impl PriceSample {
    pub const fn new(starts_at: Timestamp, total: f64) -> Self {
        Self {
            starts_at,
            total,
            level: None,
        }
    }

    #[must_use]
    pub const fn with_level(mut self, level: PriceLevel) -> Self {
        self.level = Some(level);
        self
    }
}

/// The slot the feed considers "now"
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSlot {
    pub starts_at: Timestamp,
    pub total: Option<f64>,
    pub level: Option<PriceLevel>,
}

impl CurrentSlot {
    pub const fn at(starts_at: Timestamp) -> Self {
        Self {
            starts_at,
            total: None,
            level: None,
        }
    }
}

/// Which published day a sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Today,
    Tomorrow,
}

impl Day {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
        }
    }
}

/// Current marker plus today's and tomorrow's hourly prices
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTimeline {
    pub current: CurrentSlot,
    pub today: Vec<PriceSample>,
    /// Empty until the next day's prices are published (early afternoon)
    pub tomorrow: Vec<PriceSample>,
}

impl PriceTimeline {
    pub const fn new(current: CurrentSlot, today: Vec<PriceSample>, tomorrow: Vec<PriceSample>) -> Self {
        Self {
            current,
            today,
            tomorrow,
        }
    }

    pub const fn now(&self) -> &Timestamp {
        &self.current.starts_at
    }

    pub fn day(&self, day: Day) -> &[PriceSample] {
        match day {
            Day::Today => &self.today,
            Day::Tomorrow => &self.tomorrow,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.today.is_empty() && self.tomorrow.is_empty()
    }

    /// Check the shape the selector relies on.
    ///
    /// Each day list must be in strictly ascending start order and every
    /// price must be finite.
    pub fn validate(&self) -> Result<()> {
        for day in [Day::Today, Day::Tomorrow] {
            let samples = self.day(day);
            for (idx, sample) in samples.iter().enumerate() {
                if !sample.total.is_finite() {
                    return Err(TimerError::validation(
                        format!("{}[{}].total", day.as_str(), idx),
                        format!("price must be finite, got {}", sample.total),
                    ));
                }
            }
            if let Some(idx) = samples
                .windows(2)
                .position(|pair| pair[0].starts_at >= pair[1].starts_at)
            {
                return Err(TimerError::validation(
                    format!("{}[{}].startsAt", day.as_str(), idx + 1),
                    "slots must be in ascending start order",
                ));
            }
        }
        Ok(())
    }
}
