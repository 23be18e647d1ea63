//! # Tibber Timer - cheapest-hour start offset for appliance delay timers
//!
//! Polls the Tibber price API, finds the cheapest upcoming hourly slot in
//! today's and tomorrow's prices, and reports how many hours from now an
//! appliance with a whole-hour delay timer should start.
//!
//! ## Architecture
//!
//! - `timestamp`: RFC 3339 parsing and whole-hour arithmetic
//! - `timeline`: price samples and the per-poll price timeline
//! - `selector`: cheapest upcoming slot
//! - `run_profile`: minute-of-hour correction for the appliance run profile
//! - `schedule`: composition of the above into a start offset
//! - `clock`: wall-clock source
//! - `tibber`: GraphQL client and response decoding
//! - `poller`: poll loop, price source and report sink seams
//! - `config`: YAML configuration and validation
//! - `logging`: structured logging and tracing

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod run_profile;
pub mod schedule;
pub mod selector;
pub mod tibber;
pub mod timeline;
pub mod timestamp;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, TimerError};
pub use schedule::{Recommendation, ScheduleOptions, ScheduleOutcome, compute_schedule};
pub use timeline::{PriceSample, PriceTimeline};
pub use timestamp::{HourArithmetic, Timestamp, hours_between};
