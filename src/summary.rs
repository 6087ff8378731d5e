//! Aggregate reporting over stored calendar ranges.

use crate::entry::CalendarEntry;
use crate::store::{CalendarStore, StoreResult};
use chrono::{Datelike, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts over a period. `total_days` counts entries present in the store,
/// not calendar days in the range — the summary reflects imported
/// coverage, so gaps undercount by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSummary {
    pub total_days: usize,
    pub working_days: usize,
    pub holidays: usize,
    /// Percentage of working days, rounded to one decimal. Defined as 0
    /// for an empty range.
    pub working_rate: f64,
}

impl CalendarSummary {
    fn from_entries(entries: &[CalendarEntry]) -> Self {
        let total_days = entries.len();
        let working_days = entries.iter().filter(|e| e.is_working_day).count();
        let holidays = total_days - working_days;
        let working_rate = if total_days > 0 {
            let rate = working_days as f64 / total_days as f64 * 100.0;
            (rate * 10.0).round() / 10.0
        } else {
            0.0
        };
        Self {
            total_days,
            working_days,
            holidays,
            working_rate,
        }
    }
}

/// One month's counts in a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub working_days: usize,
    pub holiday_days: usize,
}

impl MonthlyCount {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Yearly summary over `[Jan 1, Dec 31]`.
pub fn summarize_year<S: CalendarStore + ?Sized>(store: &S, year: i32) -> StoreResult<CalendarSummary> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).expect("invalid year for summary");
    let end = NaiveDate::from_ymd_opt(year, 12, 31).expect("invalid year for summary");
    summarize_range(store, start, end)
}

pub fn summarize_range<S: CalendarStore + ?Sized>(
    store: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> StoreResult<CalendarSummary> {
    let entries = store.read_range(start, end)?;
    Ok(CalendarSummary::from_entries(&entries))
}

/// Per-month working/holiday counts for the range, in chronological order.
/// Months with no stored entries are omitted rather than zero-filled,
/// consistent with `total_days` counting only what is present.
pub fn monthly_breakdown<S: CalendarStore + ?Sized>(
    store: &S,
    start: NaiveDate,
    end: NaiveDate,
) -> StoreResult<Vec<MonthlyCount>> {
    let entries = store.read_range(start, end)?;

    let mut months: BTreeMap<(i32, u32), (usize, usize)> = BTreeMap::new();
    for entry in &entries {
        let key = (entry.date.year(), entry.date.month());
        let counts = months.entry(key).or_insert((0, 0));
        if entry.is_working_day {
            counts.0 += 1;
        } else {
            counts.1 += 1;
        }
    }

    Ok(months
        .into_iter()
        .map(|((year, month), (working_days, holiday_days))| MonthlyCount {
            year,
            month,
            working_days,
            holiday_days,
        })
        .collect())
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}

/// Tabular view of a range for display callers: one row per entry with
/// date, weekday, working flag, type, name and notes columns.
pub fn entries_dataframe(entries: &[CalendarEntry]) -> PolarsResult<DataFrame> {
    let date_vals: Vec<i32> = entries.iter().map(|e| date_to_i32(e.date)).collect();
    let weekday_vals: Vec<String> = entries
        .iter()
        .map(|e| e.date.format("%a").to_string())
        .collect();
    let working_vals: Vec<bool> = entries.iter().map(|e| e.is_working_day).collect();
    let type_vals: Vec<&str> = entries.iter().map(|e| e.day_type.as_str()).collect();
    let name_vals: Vec<Option<String>> = entries.iter().map(|e| e.day_name.clone()).collect();
    let notes_vals: Vec<Option<String>> = entries.iter().map(|e| e.notes.clone()).collect();

    let mut columns: Vec<Column> = Vec::with_capacity(6);
    columns.push(
        Series::new(PlSmallStr::from_static("date"), date_vals)
            .cast(&DataType::Date)?
            .into_column(),
    );
    columns.push(Series::new(PlSmallStr::from_static("weekday"), weekday_vals).into_column());
    columns.push(Series::new(PlSmallStr::from_static("is_working_day"), working_vals).into_column());
    columns.push(Series::new(PlSmallStr::from_static("day_type"), type_vals).into_column());
    columns.push(Series::new(PlSmallStr::from_static("day_name"), name_vals).into_column());
    columns.push(Series::new(PlSmallStr::from_static("notes"), notes_vals).into_column());

    DataFrame::new(columns)
}
