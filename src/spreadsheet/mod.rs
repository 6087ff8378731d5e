//! Spreadsheet-format support for company calendar files.
//!
//! The interchange format is a single sheet with a header row. `Date` and
//! `Status` are required; `Weekday`, `Type`, `Name` and `Notes` are
//! optional. The `Weekday` column is never trusted on input — it is
//! recomputed from the date when writing.

use crate::entry::{CalendarEntry, DayType, StatusMapping};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::io;

pub mod read;
pub mod write;

pub use read::{parse_csv, parse_workbook};
pub use write::{write_csv, write_workbook};

pub const DATE_COLUMN: &str = "Date";
pub const STATUS_COLUMN: &str = "Status";
pub const WEEKDAY_COLUMN: &str = "Weekday";
pub const TYPE_COLUMN: &str = "Type";
pub const NAME_COLUMN: &str = "Name";
pub const NOTES_COLUMN: &str = "Notes";

pub(crate) const HEADERS: [&str; 6] = [
    DATE_COLUMN,
    STATUS_COLUMN,
    WEEKDAY_COLUMN,
    TYPE_COLUMN,
    NAME_COLUMN,
    NOTES_COLUMN,
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

#[derive(Debug)]
pub enum SpreadsheetError {
    Workbook(calamine::Error),
    Xlsx(rust_xlsxwriter::XlsxError),
    Csv(csv::Error),
    Io(io::Error),
    MissingSheet,
    MissingColumn(&'static str),
    InvalidData(String),
}

impl fmt::Display for SpreadsheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpreadsheetError::Workbook(err) => write!(f, "workbook error: {err}"),
            SpreadsheetError::Xlsx(err) => write!(f, "xlsx write error: {err}"),
            SpreadsheetError::Csv(err) => write!(f, "csv error: {err}"),
            SpreadsheetError::Io(err) => write!(f, "io error: {err}"),
            SpreadsheetError::MissingSheet => write!(f, "workbook contains no sheets"),
            SpreadsheetError::MissingColumn(name) => {
                write!(f, "required column '{name}' not found in header row")
            }
            SpreadsheetError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for SpreadsheetError {}

impl From<calamine::Error> for SpreadsheetError {
    fn from(value: calamine::Error) -> Self {
        Self::Workbook(value)
    }
}

impl From<rust_xlsxwriter::XlsxError> for SpreadsheetError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::Xlsx(value)
    }
}

impl From<csv::Error> for SpreadsheetError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<io::Error> for SpreadsheetError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

pub type SpreadsheetResult<T> = Result<T, SpreadsheetError>;

/// A row that could not be turned into a calendar entry. Row numbers are
/// 1-based and count the header row, matching what a user sees in a
/// spreadsheet application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub kind: RowErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowErrorKind {
    MalformedDate(String),
    UnknownStatus(String),
    InvalidDayType(String),
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RowErrorKind::MalformedDate(value) if value.is_empty() => {
                write!(f, "row {}: missing date", self.row)
            }
            RowErrorKind::MalformedDate(value) => {
                write!(f, "row {}: unparseable date '{value}'", self.row)
            }
            RowErrorKind::UnknownStatus(token) if token.is_empty() => {
                write!(f, "row {}: missing status token", self.row)
            }
            RowErrorKind::UnknownStatus(token) => {
                write!(f, "row {}: unrecognized status token '{token}'", self.row)
            }
            RowErrorKind::InvalidDayType(detail) => {
                write!(f, "row {}: invalid day type ({detail})", self.row)
            }
        }
    }
}

/// Parse output: the entries that validated plus every row that did not.
/// Row failures never abort the parse; the caller decides what an
/// acceptable error count is.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCalendar {
    pub entries: Vec<CalendarEntry>,
    pub row_errors: Vec<RowError>,
}

impl ParsedCalendar {
    /// Minimum and maximum parsed date, if any row validated.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.entries.iter().map(|e| e.date).min()?;
        let max = self.entries.iter().map(|e| e.date).max()?;
        Some((min, max))
    }
}

pub(crate) enum RawDate {
    Parsed(NaiveDate),
    Text(String),
    Empty,
}

pub(crate) struct RawRow {
    pub row: usize,
    pub date: RawDate,
    pub status: Option<String>,
    pub day_type: Option<String>,
    pub day_name: Option<String>,
    pub notes: Option<String>,
}

pub(crate) fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Shared back half of the workbook and CSV readers: raw cell values in,
/// validated entries and collected row errors out.
pub(crate) fn assemble_rows(rows: Vec<RawRow>, mapping: &StatusMapping) -> ParsedCalendar {
    let mut entries = Vec::with_capacity(rows.len());
    let mut row_errors = Vec::new();

    for raw in rows {
        let status = non_empty(raw.status);

        let date = match raw.date {
            RawDate::Parsed(date) => date,
            RawDate::Text(text) => match parse_date_text(&text) {
                Some(date) => date,
                None => {
                    row_errors.push(RowError {
                        row: raw.row,
                        kind: RowErrorKind::MalformedDate(text.trim().to_string()),
                    });
                    continue;
                }
            },
            RawDate::Empty => {
                if status.is_none() {
                    // Trailing blank rows are common in hand-edited sheets.
                    continue;
                }
                row_errors.push(RowError {
                    row: raw.row,
                    kind: RowErrorKind::MalformedDate(String::new()),
                });
                continue;
            }
        };

        let token = status.unwrap_or_default();
        let Some(is_working_day) = mapping.classify(&token) else {
            row_errors.push(RowError {
                row: raw.row,
                kind: RowErrorKind::UnknownStatus(token),
            });
            continue;
        };

        let day_type = match non_empty(raw.day_type) {
            Some(label) => match DayType::from_str(&label) {
                Some(day_type) if day_type.is_working() == is_working_day => day_type,
                Some(day_type) => {
                    row_errors.push(RowError {
                        row: raw.row,
                        kind: RowErrorKind::InvalidDayType(format!(
                            "'{}' conflicts with status token '{}'",
                            day_type.as_str(),
                            mapping.token_for(is_working_day)
                        )),
                    });
                    continue;
                }
                None => {
                    row_errors.push(RowError {
                        row: raw.row,
                        kind: RowErrorKind::InvalidDayType(format!("unknown label '{label}'")),
                    });
                    continue;
                }
            },
            None => DayType::default_for(is_working_day),
        };

        entries.push(CalendarEntry {
            date,
            is_working_day,
            day_type,
            day_name: non_empty(raw.day_name),
            notes: non_empty(raw.notes),
        });
    }

    ParsedCalendar {
        entries,
        row_errors,
    }
}
