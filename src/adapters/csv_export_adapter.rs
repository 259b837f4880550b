//! CSV spreadsheet export of the ledger.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::calendar::YearMonth;
use crate::domain::error::JournalError;
use crate::domain::trade::TradeRecord;
use crate::ports::export_port::ExportPort;

/// Column order matches the field order of [`TradeRecord`].
pub const EXPORT_COLUMNS: [&str; 12] = [
    "id",
    "date",
    "direction",
    "entry",
    "exit",
    "pl",
    "rr",
    "duration",
    "mental",
    "tag",
    "lesson",
    "screenshot",
];

pub struct CsvExportAdapter {
    file_prefix: String,
}

impl CsvExportAdapter {
    pub fn new(file_prefix: impl Into<String>) -> Self {
        Self {
            file_prefix: file_prefix.into(),
        }
    }

    pub fn file_name(&self, month: YearMonth) -> String {
        format!("{}_{}.csv", self.file_prefix, month)
    }
}

impl ExportPort for CsvExportAdapter {
    fn export(
        &self,
        snapshot: &[TradeRecord],
        month: YearMonth,
        output_dir: &Path,
    ) -> Result<PathBuf, JournalError> {
        fs::create_dir_all(output_dir).map_err(|e| JournalError::Export {
            reason: format!("failed to create {}: {}", output_dir.display(), e),
        })?;
        let path = output_dir.join(self.file_name(month));

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .map_err(|e| JournalError::Export {
                reason: format!("failed to open {}: {}", path.display(), e),
            })?;

        wtr.write_record(EXPORT_COLUMNS)
            .map_err(|e| JournalError::Export {
                reason: format!("failed to write header: {}", e),
            })?;
        for record in snapshot {
            wtr.serialize(record).map_err(|e| JournalError::Export {
                reason: format!("failed to write trade {}: {}", record.id, e),
            })?;
        }
        wtr.flush()?;

        log::info!("exported {} trades to {}", snapshot.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::{Direction, MentalState, RiskReward, Tag};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_record() -> TradeRecord {
        TradeRecord {
            id: 1718450000000,
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            direction: Direction::Short,
            entry: 18010.5,
            exit: 18000.0,
            pl: -21.0,
            rr: RiskReward::new(1.05),
            duration_minutes: 12,
            mental_state: MentalState::Frustrated,
            tag: Tag::Custom("Opening Drive".into()),
            lesson: "chased, again".into(),
            screenshot: None,
        }
    }

    #[test]
    fn file_name_uses_prefix_and_month() {
        let adapter = CsvExportAdapter::new("MNQ_Journal");
        let month = YearMonth::new(2024, 6).unwrap();
        assert_eq!(adapter.file_name(month), "MNQ_Journal_2024-06.csv");
    }

    #[test]
    fn writes_header_and_rows_in_field_order() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvExportAdapter::new("MNQ_Journal");
        let month = YearMonth::new(2024, 6).unwrap();

        let path = adapter
            .export(&[sample_record()], month, dir.path())
            .unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,date,direction,entry,exit,pl,rr,duration,mental,tag,lesson,screenshot"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1718450000000,2024-06-15,short,18010.5,18000.0,-21.0,1.1,12,🙁,Opening Drive,\"chased, again\","
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_ledger_exports_header_only() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvExportAdapter::new("Journal");
        let path = adapter
            .export(&[], YearMonth::new(2025, 1).unwrap(), dir.path())
            .unwrap();
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 1);
    }
}
