//! Ledger Store: the append-only, insertion-ordered collection of trades.
//!
//! The ledger is read once from its [`StoragePort`] blob and rewritten in full
//! after every append. A failed write leaves the in-memory append in place and
//! is reported through [`AppendOutcome::SaveFailed`].

use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

use super::error::JournalError;
use super::synthetic::DurationSource;
use super::trade::{InstrumentSpec, TradeInput, TradeRecord};
use crate::ports::storage_port::StoragePort;

/// Blob identifier the journal has always stored its trades under.
pub const DEFAULT_STORAGE_KEY: &str = "mnqTrades";

/// Outcome of [`LedgerStore::append`]. The record is in the ledger either way.
#[must_use]
#[derive(Debug)]
pub enum AppendOutcome {
    Saved { id: i64 },
    /// Durable copy may be stale until the next successful write.
    SaveFailed { id: i64, error: JournalError },
}

impl AppendOutcome {
    pub fn id(&self) -> i64 {
        match self {
            AppendOutcome::Saved { id } | AppendOutcome::SaveFailed { id, .. } => *id,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, AppendOutcome::Saved { .. })
    }
}

pub struct LedgerStore<S: StoragePort> {
    storage: S,
    key: String,
    records: Vec<TradeRecord>,
}

impl<S: StoragePort> LedgerStore<S> {
    /// Never fails: a missing blob is an empty ledger, an unreadable or
    /// corrupt one is logged and discarded, and single entries that do not
    /// parse are dropped while the rest load.
    pub fn load(storage: S, key: &str) -> Self {
        let records = match read_snapshot(&storage, key) {
            Ok(records) => records,
            Err(e) => {
                log::warn!("discarding stored ledger: {e}");
                Vec::new()
            }
        };
        let records = renumber_duplicates(records);
        log::info!("loaded {} trades from '{}'", records.len(), key);

        Self {
            storage,
            key: key.to_string(),
            records,
        }
    }

    /// Appends `record`, reassigning its id when it would not be strictly
    /// greater than every id already in the ledger, then persists the whole
    /// ledger.
    pub fn append(&mut self, mut record: TradeRecord) -> AppendOutcome {
        if let Some(max) = self.max_id() {
            if record.id <= max {
                let next = match max.checked_add(1) {
                    Some(next) => next,
                    None => {
                        compact_ids(&mut self.records);
                        self.records.len() as i64 + 1
                    }
                };
                log::debug!("trade id {} collides, reassigning {}", record.id, next);
                record.id = next;
            }
        }
        let id = record.id;
        self.records.push(record);

        match self.persist() {
            Ok(()) => AppendOutcome::Saved { id },
            Err(error) => {
                log::warn!("trade {id} kept in memory but not saved: {error}");
                AppendOutcome::SaveFailed { id, error }
            }
        }
    }

    /// Builds a record from form input dated `date` and appends it. A
    /// validation failure leaves the ledger untouched.
    pub fn add_trade(
        &mut self,
        input: &TradeInput,
        date: NaiveDate,
        instrument: &InstrumentSpec,
        durations: &mut dyn DurationSource,
    ) -> Result<AppendOutcome, JournalError> {
        let record = TradeRecord::from_input(input, self.next_id(), date, instrument, durations)?;
        Ok(self.append(record))
    }

    /// Oldest first.
    pub fn all(&self) -> &[TradeRecord] {
        &self.records
    }

    /// First record in insertion order dated `date`.
    pub fn find_by_date(&self, date: NaiveDate) -> Option<&TradeRecord> {
        self.records.iter().find(|r| r.date == date)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Millisecond timestamp, bumped past the current maximum id. When the
    /// maximum is `i64::MAX` the timestamp is returned as is and [`append`]
    /// reassigns it.
    ///
    /// [`append`]: LedgerStore::append
    pub fn next_id(&self) -> i64 {
        let candidate = Utc::now().timestamp_millis();
        match self.max_id() {
            Some(max) if candidate <= max => max.checked_add(1).unwrap_or(candidate),
            _ => candidate,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn max_id(&self) -> Option<i64> {
        self.records.iter().map(|r| r.id).max()
    }

    fn persist(&mut self) -> Result<(), JournalError> {
        let blob = serde_json::to_string(&self.records)
            .map_err(|e| JournalError::persistence(&self.key, e.to_string()))?;
        self.storage.write_blob(&self.key, &blob)
    }
}

/// A blob that is not a JSON array is corrupt as a whole. Inside the array,
/// entries that do not parse as a [`TradeRecord`] are skipped one by one.
fn read_snapshot<S: StoragePort>(storage: &S, key: &str) -> Result<Vec<TradeRecord>, JournalError> {
    let Some(blob) = storage.read_blob(key)? else {
        return Ok(Vec::new());
    };
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&blob).map_err(|e| JournalError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    let total = entries.len();
    let records: Vec<TradeRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("skipping unreadable trade #{index} in '{key}': {e}");
                None
            }
        })
        .collect();
    if records.len() < total {
        log::warn!("kept {} of {} stored trades in '{}'", records.len(), total, key);
    }
    Ok(records)
}

/// Later duplicates get fresh ids past the maximum; order is preserved.
fn renumber_duplicates(mut records: Vec<TradeRecord>) -> Vec<TradeRecord> {
    let mut next = records.iter().map(|r| r.id).max().unwrap_or(0);
    let mut seen = HashSet::with_capacity(records.len());
    for i in 0..records.len() {
        if seen.insert(records[i].id) {
            continue;
        }
        let Some(fresh) = next.checked_add(1) else {
            compact_ids(&mut records);
            return records;
        };
        next = fresh;
        log::warn!("duplicate trade id {} renumbered to {}", records[i].id, next);
        records[i].id = next;
        seen.insert(next);
    }
    records
}

/// Renumber every record `1..=len` in order. Used once ids reach `i64::MAX`.
fn compact_ids(records: &mut [TradeRecord]) {
    log::warn!("trade ids exhausted, renumbering {} trades", records.len());
    for (i, record) in records.iter_mut().enumerate() {
        record.id = i as i64 + 1;
    }
}
