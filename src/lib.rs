pub mod entry;
pub(crate) mod entry_validation;
pub mod import;
pub mod spreadsheet;
pub mod store;
pub mod summary;

pub use entry::{CalendarEntry, DayType, StatusMapping};
pub use import::{CalendarImporter, ImportError, ImportResult};
pub use spreadsheet::{
    ParsedCalendar, RowError, RowErrorKind, SpreadsheetError, parse_csv, parse_workbook, write_csv,
    write_workbook,
};
#[cfg(feature = "sqlite")]
pub use store::SqliteCalendarStore;
pub use store::{CalendarStore, MemoryCalendarStore, StoreError, StoreResult, validate_entry};
pub use summary::{
    CalendarSummary, MonthlyCount, entries_dataframe, monthly_breakdown, summarize_range,
    summarize_year,
};
