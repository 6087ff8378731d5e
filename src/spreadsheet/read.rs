use super::{
    DATE_COLUMN, NAME_COLUMN, NOTES_COLUMN, ParsedCalendar, RawDate, RawRow, STATUS_COLUMN,
    SpreadsheetError, SpreadsheetResult, TYPE_COLUMN, assemble_rows, parse_date_text,
};
use crate::entry::StatusMapping;
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

const EMPTY_CELL: Data = Data::Empty;

/// Read a calendar from workbook bytes (`.xls` or `.xlsx`, auto-detected).
/// Only the first sheet is consulted, matching how the source calendars are
/// produced.
pub fn parse_workbook(bytes: &[u8], mapping: &StatusMapping) -> SpreadsheetResult<ParsedCalendar> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::MissingSheet)??;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or(SpreadsheetError::MissingColumn(DATE_COLUMN))?;

    let date_col =
        find_column(headers, DATE_COLUMN).ok_or(SpreadsheetError::MissingColumn(DATE_COLUMN))?;
    let status_col = find_column(headers, STATUS_COLUMN)
        .ok_or(SpreadsheetError::MissingColumn(STATUS_COLUMN))?;
    let type_col = find_column(headers, TYPE_COLUMN);
    let name_col = find_column(headers, NAME_COLUMN);
    let notes_col = find_column(headers, NOTES_COLUMN);

    let mut raw_rows = Vec::new();
    for (idx, row) in rows.enumerate() {
        let cell = |col: Option<usize>| col.and_then(|c| row.get(c)).unwrap_or(&EMPTY_CELL);
        raw_rows.push(RawRow {
            // Header occupies row 1.
            row: idx + 2,
            date: cell_to_raw_date(cell(Some(date_col))),
            status: cell_to_text(cell(Some(status_col))),
            day_type: cell_to_text(cell(type_col)),
            day_name: cell_to_text(cell(name_col)),
            notes: cell_to_text(cell(notes_col)),
        });
    }

    Ok(assemble_rows(raw_rows, mapping))
}

/// Read a calendar from CSV bytes with the same header contract as the
/// workbook format.
pub fn parse_csv(bytes: &[u8], mapping: &StatusMapping) -> SpreadsheetResult<ParsedCalendar> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);

    let date_col = position(DATE_COLUMN).ok_or(SpreadsheetError::MissingColumn(DATE_COLUMN))?;
    let status_col =
        position(STATUS_COLUMN).ok_or(SpreadsheetError::MissingColumn(STATUS_COLUMN))?;
    let type_col = position(TYPE_COLUMN);
    let name_col = position(NAME_COLUMN);
    let notes_col = position(NOTES_COLUMN);

    let mut raw_rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let field = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let date = match field(Some(date_col)) {
            Some(text) => RawDate::Text(text),
            None => RawDate::Empty,
        };
        raw_rows.push(RawRow {
            row: idx + 2,
            date,
            status: field(Some(status_col)),
            day_type: field(type_col),
            day_name: field(name_col),
            notes: field(notes_col),
        });
    }

    Ok(assemble_rows(raw_rows, mapping))
}

fn find_column(headers: &[Data], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|cell| matches!(cell, Data::String(s) if s.trim() == name))
}

fn cell_to_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(v) => v.to_string(),
        Data::Float(v) if v.fract() == 0.0 => (*v as i64).to_string(),
        Data::Float(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTimeIso(s) => s.trim().to_string(),
        _ => String::new(),
    };
    if text.is_empty() { None } else { Some(text) }
}

fn cell_to_raw_date(cell: &Data) -> RawDate {
    match cell {
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) => RawDate::Parsed(datetime.date()),
            None => RawDate::Text(value.to_string()),
        },
        // ISO datetimes keep the date in the leading segment.
        Data::DateTimeIso(s) => {
            let date_part = s.split('T').next().unwrap_or(s);
            match parse_date_text(date_part) {
                Some(date) => RawDate::Parsed(date),
                None => RawDate::Text(s.clone()),
            }
        }
        Data::String(s) if s.trim().is_empty() => RawDate::Empty,
        Data::String(s) => RawDate::Text(s.clone()),
        Data::Empty => RawDate::Empty,
        other => RawDate::Text(other.to_string()),
    }
}
