//! Synthetic metrics.
//!
//! The journal records neither trade timestamps nor a real stop level, so the
//! trade duration, the risk/reward ratio and the time-of-day distribution are
//! placeholders. They live behind this module so a timestamp-backed source can
//! replace them without touching the ledger or the aggregates.

use rand::rngs::ThreadRng;
use rand::Rng;

use super::trade::{Direction, TradeRecord};

pub const MIN_DURATION_MINUTES: u32 = 3;
pub const MAX_DURATION_MINUTES: u32 = 18;

/// Number of most recent records spread over the time-of-day buckets.
pub const TIME_BUCKET_SAMPLE: usize = 9;
pub const RECORDS_PER_TIME_BUCKET: usize = 2;

/// Half-hour session blocks from 07:00 to 15:30.
pub const DEFAULT_TIME_BUCKET_LABELS: [&str; 18] = [
    "7:00", "7:30", "8:00", "8:30", "9:00", "9:30", "10:00", "10:30", "11:00", "11:30", "12:00",
    "12:30", "13:00", "13:30", "14:00", "14:30", "15:00", "15:30",
];

/// Supplies the trade-management duration for a new record.
pub trait DurationSource {
    fn duration_minutes(&mut self) -> u32;
}

/// Uniform duration in `MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES`.
pub struct RandomDuration<R: Rng> {
    rng: R,
}

impl RandomDuration<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomDuration<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomDuration<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DurationSource for RandomDuration<R> {
    fn duration_minutes(&mut self) -> u32 {
        self.rng
            .gen_range(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES)
    }
}

/// Always the same duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDuration(pub u32);

impl DurationSource for FixedDuration {
    fn duration_minutes(&mut self) -> u32 {
        self.0
    }
}

/// Risk/reward against a stop `stop_distance` points from entry, below for
/// longs and above for shorts. Not an audited risk figure.
pub fn mock_risk_reward(direction: Direction, entry: f64, exit: f64, stop_distance: f64) -> f64 {
    let stop = match direction {
        Direction::Long => entry - stop_distance,
        Direction::Short => entry + stop_distance,
    };
    let rr = ((exit - entry) / (entry - stop)).abs();
    if rr.is_finite() { rr } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    pub label: String,
    pub pl: f64,
}

/// Spread the last `TIME_BUCKET_SAMPLE` records over the buckets two at a
/// time, oldest first; overflow lands in the last bucket.
pub fn time_of_day_buckets(snapshot: &[TradeRecord], labels: &[&str]) -> Vec<TimeBucket> {
    let mut buckets: Vec<TimeBucket> = labels
        .iter()
        .map(|label| TimeBucket {
            label: label.to_string(),
            pl: 0.0,
        })
        .collect();
    if buckets.is_empty() {
        return buckets;
    }

    let last = buckets.len() - 1;
    let start = snapshot.len().saturating_sub(TIME_BUCKET_SAMPLE);
    for (i, record) in snapshot[start..].iter().enumerate() {
        let slot = (i / RECORDS_PER_TIME_BUCKET).min(last);
        buckets[slot].pl += record.pl;
    }
    buckets
}
