use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tibber_timer::clock::FixedClock;
use tibber_timer::poller::{LogSink, PriceSource, Poller, ReportSink, format_outcome};
use tibber_timer::schedule::{ScheduleOptions, ScheduleOutcome};
use tibber_timer::timeline::{CurrentSlot, PriceSample, PriceTimeline};
use tibber_timer::timestamp::Timestamp;
use tibber_timer::{Result, TimerError};
use tokio::sync::watch;

/// Hands out queued responses; fails with a network error once the queue is empty
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<PriceTimeline>>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<PriceTimeline>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch_price_timeline(&self) -> Result<PriceTimeline> {
        let mut queue = self.responses.lock().unwrap();
        match queue.pop_front() {
            Some(next) => next,
            None => Err(TimerError::network("script exhausted")),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    outcomes: Vec<ScheduleOutcome>,
}

impl ReportSink for RecordingSink {
    fn report(&mut self, outcome: &ScheduleOutcome) {
        self.outcomes.push(outcome.clone());
    }
}

fn ts(s: &str) -> Timestamp {
    Timestamp::parse(s).unwrap()
}

fn example_timeline() -> PriceTimeline {
    PriceTimeline::new(
        CurrentSlot::at(ts("2024-01-01T10:00:00Z")),
        vec![
            PriceSample::new(ts("2024-01-01T11:00:00Z"), 0.30),
            PriceSample::new(ts("2024-01-01T12:00:00Z"), 0.10),
        ],
        vec![PriceSample::new(ts("2024-01-02T00:00:00Z"), 0.05)],
    )
}

fn clock_at_minute(minute: u32) -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 10, minute, 0).unwrap())
}

fn poller(
    responses: Vec<Result<PriceTimeline>>,
    minute: u32,
) -> Poller<ScriptedSource, FixedClock, RecordingSink> {
    Poller::new(
        ScriptedSource::new(responses),
        clock_at_minute(minute),
        RecordingSink::default(),
        ScheduleOptions::default(),
        Duration::from_millis(10),
    )
}

#[tokio::test]
async fn successful_cycle_reports_once() {
    let mut p = poller(vec![Ok(example_timeline())], 45);
    let outcome = p.poll_once().await.unwrap();
    assert_eq!(outcome.offset(), Some(13));
    assert_eq!(p.sink().outcomes.len(), 1);
    assert_eq!(p.sink().outcomes[0], outcome);

    let stats = p.stats();
    assert_eq!(stats.total_polls, 1);
    assert_eq!(stats.failed_polls, 0);
    assert_eq!(stats.last_offset, Some(13));
}

#[tokio::test]
async fn fetch_failure_skips_cycle_without_report() {
    let mut p = poller(
        vec![
            Err(TimerError::api("Tibber API error: 502 Bad Gateway")),
            Ok(example_timeline()),
        ],
        10,
    );
    let err = p.poll_once().await.unwrap_err();
    assert!(matches!(err, TimerError::Api { .. }));
    assert!(p.sink().outcomes.is_empty());

    // Next cycle recovers
    let outcome = p.poll_once().await.unwrap();
    assert_eq!(outcome.offset(), Some(14));
    assert_eq!(p.sink().outcomes.len(), 1);
    assert_eq!(p.stats().failed_polls, 1);
    assert_eq!(p.stats().total_polls, 2);
}

#[tokio::test]
async fn no_candidate_is_reported_without_offset() {
    let empty = PriceTimeline::new(CurrentSlot::at(ts("2024-01-01T10:00:00Z")), vec![], vec![]);
    let mut p = poller(vec![Ok(example_timeline()), Ok(empty)], 45);
    p.poll_once().await.unwrap();
    let outcome = p.poll_once().await.unwrap();
    assert_eq!(outcome, ScheduleOutcome::NoCandidate);
    assert_eq!(p.sink().outcomes.len(), 2);
    assert!(p.sink().outcomes[1].offset().is_none());
    assert_eq!(p.stats().last_offset, None);
}

#[tokio::test]
async fn unordered_timeline_is_still_scheduled() {
    let unordered = PriceTimeline::new(
        CurrentSlot::at(ts("2024-01-01T10:00:00Z")),
        vec![],
        vec![
            PriceSample::new(ts("2024-01-02T05:00:00Z"), 0.05),
            PriceSample::new(ts("2024-01-02T01:00:00Z"), 0.20),
        ],
    );
    assert!(unordered.validate().is_err());

    let mut p = poller(vec![Ok(unordered)], 0);
    let outcome = p.poll_once().await.unwrap();
    assert_eq!(outcome.offset(), Some(19));
    assert_eq!(p.sink().outcomes.len(), 1);
    assert_eq!(p.stats().failed_polls, 0);
}

#[tokio::test]
async fn run_loop_stops_on_shutdown_and_survives_failures() {
    let mut p = poller(vec![Err(TimerError::network("connection reset")), Ok(example_timeline())], 0);
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        let _ = tx.send(true);
    });

    tokio::time::timeout(Duration::from_secs(5), p.run(rx))
        .await
        .expect("poll loop did not stop")
        .unwrap();

    let stats = p.stats();
    assert!(stats.total_polls >= 2, "stats: {stats:?}");
    assert!(stats.failed_polls >= 1);
    assert_eq!(p.sink().outcomes.len(), 1);
}

#[tokio::test]
async fn run_loop_stops_when_sender_dropped() {
    let mut p = poller(vec![Ok(example_timeline())], 0);
    let (tx, rx) = watch::channel(false);
    drop(tx);
    tokio::time::timeout(Duration::from_secs(5), p.run(rx))
        .await
        .expect("poll loop did not stop")
        .unwrap();
}

#[test]
fn report_line_names_corrected_offset() {
    let outcome = tibber_timer::compute_schedule(&example_timeline(), 45, &ScheduleOptions::default());
    let line = format_outcome(&outcome);
    assert!(line.starts_with("Hours until best price: 13 "), "{line}");
    assert!(line.contains("slot 2024-01-02T00:00:00Z"), "{line}");
    assert!(line.contains("raw=14"), "{line}");
    assert!(line.contains("minute=45"), "{line}");
}

#[test]
fn report_line_without_candidate_has_no_offset() {
    let line = format_outcome(&ScheduleOutcome::NoCandidate);
    assert!(line.contains("no recommendation"), "{line}");
    assert!(!line.contains("Hours until best price"), "{line}");
    assert!(!line.chars().any(|c| c.is_ascii_digit()), "{line}");
}

#[test]
fn log_sink_accepts_both_outcomes() {
    let mut sink = LogSink::new();
    sink.report(&ScheduleOutcome::NoCandidate);
    let outcome = tibber_timer::compute_schedule(&example_timeline(), 45, &ScheduleOptions::default());
    sink.report(&outcome);
}
