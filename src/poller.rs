//! Poll loop: fetch prices, compute the start offset, report it
//!
//! A failed fetch skips the cycle; the loop keeps going and tries again on
//! the next tick. A timeline that fails validation is logged and still
//! scheduled.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};

use crate::clock::Clock;
use crate::error::Result;
use crate::logging::{LogContext, StructuredLogger, get_logger, get_logger_with_context};
use crate::schedule::{ScheduleOptions, ScheduleOutcome, compute_schedule};
use crate::timeline::PriceTimeline;

/// Source of price timelines
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price_timeline(&self) -> Result<PriceTimeline>;
}

/// Receives the outcome of every successful cycle
pub trait ReportSink: Send {
    fn report(&mut self, outcome: &ScheduleOutcome);
}

/// Writes outcomes to the log
#[derive(Debug, Clone)]
pub struct LogSink {
    logger: StructuredLogger,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            logger: get_logger("report"),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportSink for LogSink {
    fn report(&mut self, outcome: &ScheduleOutcome) {
        let line = format_outcome(outcome);
        match outcome {
            ScheduleOutcome::Recommended(_) => self.logger.info(&line),
            ScheduleOutcome::NoCandidate => self.logger.warn(&line),
        }
    }
}

/// The report line for one cycle's outcome
pub fn format_outcome(outcome: &ScheduleOutcome) -> String {
    match outcome {
        ScheduleOutcome::Recommended(rec) => format!(
            "Hours until best price: {} (slot {} total={:.4}, raw={}, minute={})",
            rec.offset,
            rec.selection.sample.starts_at,
            rec.selection.total(),
            rec.raw_offset,
            rec.minute_of_hour
        ),
        ScheduleOutcome::NoCandidate => {
            "No upcoming price slot available, no recommendation".to_string()
        }
    }
}

/// Counters over the poller's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub total_polls: u64,
    pub failed_polls: u64,
    /// Cycles that took longer than the poll interval
    pub overrun_count: u64,
    pub last_offset: Option<i64>,
}

/// Drives price fetching and reporting on a fixed interval
pub struct Poller<S, C, R> {
    source: S,
    clock: C,
    sink: R,
    options: ScheduleOptions,
    poll_interval: Duration,
    stats: PollStats,
    logger: StructuredLogger,
}

impl<S, C, R> Poller<S, C, R>
where
    S: PriceSource,
    C: Clock,
    R: ReportSink,
{
    pub fn new(source: S, clock: C, sink: R, options: ScheduleOptions, poll_interval: Duration) -> Self {
        Self {
            source,
            clock,
            sink,
            options,
            poll_interval,
            stats: PollStats::default(),
            logger: get_logger("poller"),
        }
    }

    pub const fn stats(&self) -> PollStats {
        self.stats
    }

    pub const fn sink(&self) -> &R {
        &self.sink
    }

    /// Run a single cycle and report its outcome
    pub async fn poll_once(&mut self) -> Result<ScheduleOutcome> {
        self.stats.total_polls = self.stats.total_polls.saturating_add(1);
        let logger = get_logger_with_context(LogContext::new("poller").with_cycle(self.stats.total_polls));

        let result = self.evaluate().await;
        match &result {
            Ok(outcome) => {
                self.stats.last_offset = outcome.offset();
                self.sink.report(outcome);
            }
            Err(e) => {
                self.stats.failed_polls = self.stats.failed_polls.saturating_add(1);
                logger.error(&format!("Poll cycle skipped: {e}"));
            }
        }
        result
    }

    async fn evaluate(&self) -> Result<ScheduleOutcome> {
        let timeline = self.source.fetch_price_timeline().await?;
        // Selection is order-independent; malformed lists are only flagged
        if let Err(e) = timeline.validate() {
            self.logger.warn(&format!("Price timeline looks malformed: {e}"));
        }
        // Read the clock after the fetch so a slow request does not skew the minute
        let minute = self.clock.minute_of_hour();
        Ok(compute_schedule(&timeline, minute, &self.options))
    }

    /// Poll until `shutdown` flips to `true` or its sender is dropped
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        self.logger.info(&format!(
            "Starting poll loop (interval {} ms, arithmetic {}, late start after minute {})",
            self.poll_interval.as_millis(),
            self.options.arithmetic.as_str(),
            self.options.run_profile.late_start_minute
        ));

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let started = Instant::now();
                    // Errors are logged and counted inside poll_once
                    let _ = self.poll_once().await;
                    if started.elapsed() > self.poll_interval {
                        self.stats.overrun_count = self.stats.overrun_count.saturating_add(1);
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.logger.info("Shutdown signal received");
                        break;
                    }
                }
            }
        }

        self.logger.info(&format!(
            "Poll loop stopped after {} polls ({} failed)",
            self.stats.total_polls, self.stats.failed_polls
        ));
        Ok(())
    }
}
