//! Resolved journal settings.

use std::path::PathBuf;

use super::ledger::DEFAULT_STORAGE_KEY;
use super::metrics::{DEFAULT_EQUITY_WINDOW, DEFAULT_STREAK_WINDOW};
use super::trade::InstrumentSpec;

pub const DEFAULT_STORAGE_DIR: &str = ".tradejournal";
pub const DEFAULT_EXPORT_PREFIX: &str = "MNQ_Journal";

#[derive(Debug, Clone, PartialEq)]
pub struct JournalConfig {
    pub storage_dir: PathBuf,
    pub storage_key: String,
    pub instrument: InstrumentSpec,
    pub streak_window: usize,
    pub equity_window: usize,
    pub export_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        JournalConfig {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            instrument: InstrumentSpec::default(),
            streak_window: DEFAULT_STREAK_WINDOW,
            equity_window: DEFAULT_EQUITY_WINDOW,
            export_dir: PathBuf::from("."),
            file_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
        }
    }
}
