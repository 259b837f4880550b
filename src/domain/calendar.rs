//! Month calendar for the P/L heatmap.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use super::error::JournalError;
use super::trade::TradeRecord;

pub const DAYS_IN_CALENDAR: usize = 31;

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, JournalError> {
        if !(1..=12).contains(&month) {
            return Err(JournalError::validation(
                "month",
                format!("month must be between 1 and 12, got {month}"),
            ));
        }
        Ok(YearMonth { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || JournalError::validation("month", format!("'{}' is not YYYY-MM", s.trim()));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month)
    }
}

/// Colour class of a day or trade on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    Win,
    Loss,
    NoTrade,
}

impl DayOutcome {
    pub fn of(pl: Option<f64>) -> Self {
        match pl {
            Some(pl) if pl >= 0.0 => DayOutcome::Win,
            Some(_) => DayOutcome::Loss,
            None => DayOutcome::NoTrade,
        }
    }
}

/// One P/L slot per day of the month. `None` means no trade that day, which
/// keeps it distinct from a break-even trade.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyCalendar {
    pub month: YearMonth,
    pub slots: [Option<f64>; DAYS_IN_CALENDAR],
}

impl MonthlyCalendar {
    /// Later records on the same day overwrite earlier ones.
    pub fn build(snapshot: &[TradeRecord], month: YearMonth) -> Self {
        let mut slots = [None; DAYS_IN_CALENDAR];
        for record in snapshot.iter().filter(|r| month.contains(r.date)) {
            slots[record.date.day0() as usize] = Some(record.pl);
        }
        MonthlyCalendar { month, slots }
    }

    /// Slots with empty days flattened to zero, as the chart consumes them.
    pub fn values(&self) -> [f64; DAYS_IN_CALENDAR] {
        self.slots.map(|slot| slot.unwrap_or(0.0))
    }

    pub fn outcomes(&self) -> [DayOutcome; DAYS_IN_CALENDAR] {
        self.slots.map(DayOutcome::of)
    }
}
