//! Ledger export port trait.

use std::path::{Path, PathBuf};

use crate::domain::calendar::YearMonth;
use crate::domain::error::JournalError;
use crate::domain::trade::TradeRecord;

/// Sink turning a ledger snapshot into a spreadsheet-style file.
pub trait ExportPort {
    /// Writes one row per record into `output_dir` and returns the file path.
    fn export(
        &self,
        snapshot: &[TradeRecord],
        month: YearMonth,
        output_dir: &Path,
    ) -> Result<PathBuf, JournalError>;
}
