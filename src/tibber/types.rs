//! Wire types for the Tibber GraphQL price query
//!
//! Timestamps stay as text here and are parsed during conversion into
//! [`PriceTimeline`], so a malformed value surfaces as a timestamp error
//! naming the offending field instead of a generic decode failure.

use serde::Deserialize;

use crate::error::{Result, TimerError};
use crate::timeline::{CurrentSlot, PriceLevel, PriceSample, PriceTimeline};
use crate::timestamp::Timestamp;

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    pub data: Option<ViewerData>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    pub extensions: Option<GraphQlErrorExtensions>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorExtensions {
    pub code: Option<String>,
}

impl GraphQlError {
    pub fn is_unauthenticated(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|e| e.code.as_deref())
            .is_some_and(|code| code.eq_ignore_ascii_case("UNAUTHENTICATED"))
    }
}

#[derive(Debug, Deserialize)]
pub struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub struct Viewer {
    pub homes: Option<Vec<Home>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Home {
    pub id: Option<String>,
    pub current_subscription: Option<Subscription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub price_info: Option<RawPriceInfo>,
}

#[derive(Debug, Deserialize)]
pub struct RawPriceInfo {
    pub current: Option<RawPrice>,
    pub today: Option<Vec<RawPrice>>,
    pub tomorrow: Option<Vec<RawPrice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrice {
    pub starts_at: Option<String>,
    pub total: Option<f64>,
    pub level: Option<String>,
}

impl RawPrice {
    fn starts_at(&self, field: &str) -> Result<Timestamp> {
        let text = self
            .starts_at
            .as_deref()
            .ok_or_else(|| TimerError::validation(format!("{field}.startsAt"), "missing"))?;
        Timestamp::parse(text).map_err(|e| match e {
            TimerError::Timestamp { input, message } => {
                TimerError::timestamp(input, format!("{field}.startsAt: {message}"))
            }
            other => other,
        })
    }

    fn level(&self) -> Option<PriceLevel> {
        self.level.as_deref().map(PriceLevel::from_label)
    }

    fn to_sample(&self, field: &str) -> Result<PriceSample> {
        let total = self
            .total
            .ok_or_else(|| TimerError::validation(format!("{field}.total"), "missing"))?;
        Ok(PriceSample {
            starts_at: self.starts_at(field)?,
            total,
            level: self.level(),
        })
    }
}

fn convert_day(day: &str, raw: Option<&Vec<RawPrice>>) -> Result<Vec<PriceSample>> {
    raw.map(|prices| {
        prices
            .iter()
            .enumerate()
            .map(|(idx, p)| p.to_sample(&format!("{day}[{idx}]")))
            .collect()
    })
    .unwrap_or_else(|| Ok(Vec::new()))
}

impl TryFrom<RawPriceInfo> for PriceTimeline {
    type Error = TimerError;

    fn try_from(raw: RawPriceInfo) -> Result<Self> {
        let current = raw
            .current
            .as_ref()
            .ok_or_else(|| TimerError::validation("current", "missing current price slot"))?;
        let current = CurrentSlot {
            starts_at: current.starts_at("current")?,
            total: current.total,
            level: current.level(),
        };
        Ok(Self::new(
            current,
            convert_day("today", raw.today.as_ref())?,
            convert_day("tomorrow", raw.tomorrow.as_ref())?,
        ))
    }
}

/// Pick the configured home, or the first one.
///
/// The boolean is `true` when a configured id was not found and the first
/// home was used instead.
pub fn choose_home(homes: Vec<Home>, home_id: Option<&str>) -> Option<(Home, bool)> {
    let wanted = home_id.map(str::trim).filter(|h| !h.is_empty());
    let mut homes = homes.into_iter();
    match wanted {
        None => homes.next().map(|h| (h, false)),
        Some(id) => {
            let all: Vec<Home> = homes.collect();
            let pos = all.iter().position(|h| h.id.as_deref() == Some(id));
            let fell_back = pos.is_none();
            all.into_iter().nth(pos.unwrap_or(0)).map(|h| (h, fell_back))
        }
    }
}
