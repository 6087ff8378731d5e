//! Import pipeline: parse a calendar file, optionally clear the covered
//! date range, and upsert the parsed entries into a store.

use crate::entry::{CalendarEntry, DayType, StatusMapping};
use crate::spreadsheet::{self, ParsedCalendar, RowError, SpreadsheetError};
use crate::store::{CalendarStore, StoreError, StoreResult};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Outcome of one import. `row_errors` lists every rejected row so callers
/// can show a complete problem report next to the summary message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
    pub entries_imported: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub row_errors: Vec<RowError>,
}

#[derive(Debug)]
pub enum ImportError {
    Spreadsheet(SpreadsheetError),
    Store(StoreError),
    /// A write failed after `written` entries had already landed. The store
    /// holds exactly that prefix; nothing is rolled back silently.
    PartialWrite {
        written: usize,
        source: StoreError,
    },
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Spreadsheet(err) => write!(f, "calendar file rejected: {err}"),
            ImportError::Store(err) => write!(f, "{err}"),
            ImportError::PartialWrite { written, source } => {
                write!(f, "import aborted after {written} entries: {source}")
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl From<SpreadsheetError> for ImportError {
    fn from(value: SpreadsheetError) -> Self {
        Self::Spreadsheet(value)
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Orchestrates parse → clear → upsert against a [`CalendarStore`], and
/// carries the status-token mapping shared by import and export.
pub struct CalendarImporter<'a, S: CalendarStore + ?Sized> {
    store: &'a S,
    mapping: StatusMapping,
}

impl<'a, S: CalendarStore + ?Sized> CalendarImporter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_mapping(store, StatusMapping::default())
    }

    pub fn with_mapping(store: &'a S, mapping: StatusMapping) -> Self {
        Self { store, mapping }
    }

    pub fn mapping(&self) -> &StatusMapping {
        &self.mapping
    }

    /// Import an `.xls`/`.xlsx` workbook. With `overwrite`, existing
    /// entries inside the parsed date range are deleted first; entries
    /// outside that range are never touched.
    pub fn import_workbook(&self, bytes: &[u8], overwrite: bool) -> Result<ImportResult, ImportError> {
        let parsed = spreadsheet::parse_workbook(bytes, &self.mapping)?;
        self.apply(parsed, overwrite)
    }

    /// Import CSV bytes with the same semantics as [`Self::import_workbook`].
    pub fn import_csv(&self, bytes: &[u8], overwrite: bool) -> Result<ImportResult, ImportError> {
        let parsed = spreadsheet::parse_csv(bytes, &self.mapping)?;
        self.apply(parsed, overwrite)
    }

    fn apply(&self, parsed: ParsedCalendar, overwrite: bool) -> Result<ImportResult, ImportError> {
        let Some((start, end)) = parsed.date_range() else {
            return Ok(ImportResult {
                success: false,
                message: format!(
                    "no valid calendar rows found ({} rejected)",
                    parsed.row_errors.len()
                ),
                entries_imported: 0,
                date_range: None,
                row_errors: parsed.row_errors,
            });
        };

        if overwrite {
            self.store
                .delete_range(start, end)
                .map_err(|source| ImportError::PartialWrite { written: 0, source })?;
        }

        let mut written = 0;
        for entry in &parsed.entries {
            self.store
                .upsert(entry)
                .map_err(|source| ImportError::PartialWrite { written, source })?;
            written += 1;
        }

        let message = if parsed.row_errors.is_empty() {
            format!("imported {written} calendar entries ({start} to {end})")
        } else {
            format!(
                "imported {written} calendar entries ({start} to {end}), {} rows rejected",
                parsed.row_errors.len()
            )
        };

        Ok(ImportResult {
            success: true,
            message,
            entries_imported: written,
            date_range: Some((start, end)),
            row_errors: parsed.row_errors,
        })
    }

    /// Register a single non-working date. Shares the upsert path with bulk
    /// import, so repeating the call just replaces the entry.
    pub fn add_holiday(
        &self,
        date: NaiveDate,
        day_type: DayType,
        day_name: Option<&str>,
        notes: Option<&str>,
    ) -> StoreResult<()> {
        let entry = CalendarEntry {
            date,
            is_working_day: false,
            day_type,
            day_name: day_name.map(str::to_string),
            notes: notes.map(str::to_string),
        };
        self.store.upsert(&entry)
    }

    /// Register a single working date, e.g. a weekend shifted to makeup
    /// work.
    pub fn add_working_day(&self, date: NaiveDate, notes: Option<&str>) -> StoreResult<()> {
        let entry = CalendarEntry {
            date,
            is_working_day: true,
            day_type: DayType::Regular,
            day_name: None,
            notes: notes.map(str::to_string),
        };
        self.store.upsert(&entry)
    }

    /// Remove a single date from the calendar.
    pub fn remove_date(&self, date: NaiveDate) -> StoreResult<bool> {
        self.store.delete_date(date)
    }

    /// Export the stored range as workbook bytes. Re-importing the output
    /// reproduces the same `(date, status, type)` records.
    pub fn export_workbook(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<u8>, ImportError> {
        let entries = self.store.read_range(start, end)?;
        Ok(spreadsheet::write_workbook(&entries, &self.mapping)?)
    }

    /// Export the stored range as CSV bytes.
    pub fn export_csv(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<u8>, ImportError> {
        let entries = self.store.read_range(start, end)?;
        Ok(spreadsheet::write_csv(&entries, &self.mapping)?)
    }
}
