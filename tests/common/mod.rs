#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tradejournal::domain::error::JournalError;
use tradejournal::domain::trade::{
    Direction, MentalState, RiskReward, SetupTag, Tag, TradeInput, TradeRecord,
};
use tradejournal::ports::storage_port::StoragePort;

/// In-memory storage with switchable failures.
#[derive(Default)]
pub struct MockStoragePort {
    pub blobs: HashMap<String, String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl MockStoragePort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(mut self, key: &str, contents: &str) -> Self {
        self.blobs.insert(key.to_string(), contents.to_string());
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl StoragePort for MockStoragePort {
    fn read_blob(&self, key: &str) -> Result<Option<String>, JournalError> {
        if self.fail_reads {
            return Err(JournalError::persistence(key, "storage unavailable"));
        }
        Ok(self.blobs.get(key).cloned())
    }

    fn write_blob(&mut self, key: &str, contents: &str) -> Result<(), JournalError> {
        if self.fail_writes {
            return Err(JournalError::persistence(key, "quota exceeded"));
        }
        self.writes += 1;
        self.blobs.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_record(id: i64, day: NaiveDate, pl: f64) -> TradeRecord {
    make_tagged_record(id, day, pl, Tag::Setup(SetupTag::VwapBounce))
}

pub fn make_tagged_record(id: i64, day: NaiveDate, pl: f64, tag: Tag) -> TradeRecord {
    TradeRecord {
        id,
        date: day,
        direction: Direction::Long,
        entry: 18000.0,
        exit: 18000.0 + pl / 2.0,
        pl,
        rr: RiskReward::new((pl / 20.0).abs()),
        duration_minutes: 10,
        mental_state: MentalState::Neutral,
        tag,
        lesson: String::new(),
        screenshot: None,
    }
}

/// Record with explicit prices, for storage round trips.
pub fn make_priced_record(id: i64, day: NaiveDate, entry: f64, exit: f64, pl: f64) -> TradeRecord {
    TradeRecord {
        entry,
        exit,
        ..make_record(id, day, pl)
    }
}

pub fn make_input(entry: &str, exit: &str, tag: Tag, mental: i64) -> TradeInput {
    TradeInput {
        direction: Direction::Long,
        entry: entry.to_string(),
        exit: exit.to_string(),
        tag,
        mental,
        lesson: String::new(),
        screenshot: None,
    }
}
