use crate::entry::CalendarEntry;
use crate::entry_validation;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryCalendarStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCalendarStore;

#[derive(Debug)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    InvalidEntry(String),
    Read(String),
    Write(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            StoreError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            StoreError::InvalidEntry(msg) => write!(f, "invalid entry: {msg}"),
            StoreError::Read(msg) => write!(f, "store read failed: {msg}"),
            StoreError::Write(msg) => write!(f, "store write failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reject entries whose working flag contradicts their day type. Every
/// store backend runs this on upsert so the invariant holds no matter
/// which write path produced the entry.
pub fn validate_entry(entry: &CalendarEntry) -> StoreResult<()> {
    entry_validation::validate_entry(entry)
        .map_err(|err| StoreError::InvalidEntry(err.to_string()))
}

/// Keyed calendar-record storage. One entry per date; `upsert` replaces.
///
/// Only the three range primitives are required. The query helpers are
/// default methods over `read_range`, so any backend satisfying the
/// primitives gets them for free.
pub trait CalendarStore {
    /// Insert or replace the entry for its date.
    fn upsert(&self, entry: &CalendarEntry) -> StoreResult<()>;

    /// Delete every entry in `[start, end]`, returning how many were
    /// removed.
    fn delete_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<usize>;

    /// All entries in `[start, end]`, ordered by date.
    fn read_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<CalendarEntry>>;

    fn read_date(&self, date: NaiveDate) -> StoreResult<Option<CalendarEntry>> {
        Ok(self.read_range(date, date)?.into_iter().next())
    }

    fn delete_date(&self, date: NaiveDate) -> StoreResult<bool> {
        Ok(self.delete_range(date, date)? > 0)
    }

    /// Whether a date is worked. Unregistered dates fall back to weekday
    /// arithmetic: Saturday and Sunday are non-working, everything else is
    /// working.
    fn is_working_day(&self, date: NaiveDate) -> StoreResult<bool> {
        match self.read_date(date)? {
            Some(entry) => Ok(entry.is_working_day),
            None => Ok(!matches!(date.weekday(), Weekday::Sat | Weekday::Sun)),
        }
    }

    /// The `skip`-th working day strictly after `after` (`skip = 1` means
    /// the next one). Terminates because the unregistered-date fallback
    /// always yields working weekdays.
    fn next_working_day(&self, after: NaiveDate, skip: usize) -> StoreResult<NaiveDate> {
        let mut current = after;
        let mut found = 0;
        while found < skip.max(1) {
            current += Duration::days(1);
            if self.is_working_day(current)? {
                found += 1;
            }
        }
        Ok(current)
    }

    /// Ordered working dates registered in `[start, end]`.
    fn working_days_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<NaiveDate>> {
        Ok(self
            .read_range(start, end)?
            .into_iter()
            .filter(|entry| entry.is_working_day)
            .map(|entry| entry.date)
            .collect())
    }
}
