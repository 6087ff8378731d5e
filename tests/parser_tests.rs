use calendar_tool::{
    DayType, RowErrorKind, SpreadsheetError, StatusMapping, parse_csv, parse_workbook,
};
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn workbook_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

#[test]
fn parses_valid_rows_with_default_mapping() {
    let bytes = workbook_bytes(&[
        &["Date", "Status"],
        &["2025-01-06", "W"],
        &["2025-01-11", "H"],
    ]);
    let parsed = parse_workbook(&bytes, &StatusMapping::default()).unwrap();

    assert!(parsed.row_errors.is_empty());
    assert_eq!(parsed.entries.len(), 2);

    assert_eq!(parsed.entries[0].date, d(2025, 1, 6));
    assert!(parsed.entries[0].is_working_day);
    assert_eq!(parsed.entries[0].day_type, DayType::Regular);

    assert_eq!(parsed.entries[1].date, d(2025, 1, 11));
    assert!(!parsed.entries[1].is_working_day);
    assert_eq!(parsed.entries[1].day_type, DayType::Holiday);

    assert_eq!(parsed.date_range(), Some((d(2025, 1, 6), d(2025, 1, 11))));
}

#[test]
fn unknown_status_is_collected_without_aborting_the_parse() {
    let bytes = workbook_bytes(&[
        &["Date", "Status"],
        &["2025-01-06", "W"],
        &["2025-01-07", "maybe"],
        &["2025-01-08", "W"],
    ]);
    let parsed = parse_workbook(&bytes, &StatusMapping::default()).unwrap();

    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.row_errors.len(), 1);
    assert_eq!(parsed.row_errors[0].row, 3);
    assert_eq!(
        parsed.row_errors[0].kind,
        RowErrorKind::UnknownStatus("maybe".to_string())
    );
}

#[test]
fn malformed_dates_are_collected_with_row_numbers() {
    let bytes = workbook_bytes(&[
        &["Date", "Status"],
        &["not-a-date", "W"],
        &["2025-01-07", "W"],
        &["2025-13-40", "H"],
    ]);
    let parsed = parse_workbook(&bytes, &StatusMapping::default()).unwrap();

    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.row_errors.len(), 2);
    assert_eq!(parsed.row_errors[0].row, 2);
    assert_eq!(
        parsed.row_errors[0].kind,
        RowErrorKind::MalformedDate("not-a-date".to_string())
    );
    assert_eq!(parsed.row_errors[1].row, 4);
}

#[test]
fn missing_required_column_fails_the_whole_parse() {
    let bytes = workbook_bytes(&[&["Date", "Comment"], &["2025-01-06", "W"]]);
    let err = parse_workbook(&bytes, &StatusMapping::default()).unwrap_err();
    assert!(matches!(err, SpreadsheetError::MissingColumn("Status")));
}

#[test]
fn type_column_overrides_the_default_classification() {
    let bytes = workbook_bytes(&[
        &["Date", "Status", "Type", "Name"],
        &["2025-01-01", "H", "special-closure", "Year-end shutdown"],
        &["2025-01-11", "W", "makeup-workday", ""],
    ]);
    let parsed = parse_workbook(&bytes, &StatusMapping::default()).unwrap();

    assert!(parsed.row_errors.is_empty());
    assert_eq!(parsed.entries[0].day_type, DayType::SpecialClosure);
    assert_eq!(
        parsed.entries[0].day_name.as_deref(),
        Some("Year-end shutdown")
    );
    assert_eq!(parsed.entries[1].day_type, DayType::MakeupWorkday);
    assert_eq!(parsed.entries[1].day_name, None);
}

#[test]
fn type_column_conflicting_with_status_is_a_row_error() {
    let bytes = workbook_bytes(&[
        &["Date", "Status", "Type"],
        &["2025-01-06", "H", "makeup-workday"],
        &["2025-01-07", "W", "nonsense"],
    ]);
    let parsed = parse_workbook(&bytes, &StatusMapping::default()).unwrap();

    assert!(parsed.entries.is_empty());
    assert_eq!(parsed.row_errors.len(), 2);
    assert!(matches!(
        parsed.row_errors[0].kind,
        RowErrorKind::InvalidDayType(_)
    ));
    assert!(matches!(
        parsed.row_errors[1].kind,
        RowErrorKind::InvalidDayType(_)
    ));
}

#[test]
fn custom_status_tokens_are_honored() {
    let mapping = StatusMapping::new("1", "0");
    let bytes = workbook_bytes(&[&["Date", "Status"], &["2025-01-06", "1"], &["2025-01-07", "0"]]);
    let parsed = parse_workbook(&bytes, &mapping).unwrap();

    assert!(parsed.row_errors.is_empty());
    assert!(parsed.entries[0].is_working_day);
    assert!(!parsed.entries[1].is_working_day);

    // The default tokens are unknown under a custom mapping.
    let bytes = workbook_bytes(&[&["Date", "Status"], &["2025-01-06", "W"]]);
    let parsed = parse_workbook(&bytes, &mapping).unwrap();
    assert!(parsed.entries.is_empty());
    assert_eq!(parsed.row_errors.len(), 1);
}

#[test]
fn blank_rows_are_skipped_silently() {
    let bytes = workbook_bytes(&[
        &["Date", "Status"],
        &["2025-01-06", "W"],
        &["", ""],
        &["", ""],
    ]);
    let parsed = parse_workbook(&bytes, &StatusMapping::default()).unwrap();
    assert_eq!(parsed.entries.len(), 1);
    assert!(parsed.row_errors.is_empty());
}

#[test]
fn weekday_column_is_ignored_on_input() {
    // The weekday label says Friday but 2025-01-06 is a Monday; the date
    // wins and the row still parses.
    let bytes = workbook_bytes(&[
        &["Date", "Weekday", "Status"],
        &["2025-01-06", "Fri", "W"],
    ]);
    let parsed = parse_workbook(&bytes, &StatusMapping::default()).unwrap();
    assert_eq!(parsed.entries.len(), 1);
    assert_eq!(parsed.entries[0].weekday(), chrono::Weekday::Mon);
}

#[test]
fn csv_input_shares_the_same_contract() {
    let csv = "Date,Status,Type,Name,Notes\n\
               2025/01/06,W,,,\n\
               2025-01-07,maybe,,,\n\
               2025-01-13,H,holiday,Coming of Age Day,moved\n";
    let parsed = parse_csv(csv.as_bytes(), &StatusMapping::default()).unwrap();

    assert_eq!(parsed.entries.len(), 2);
    assert_eq!(parsed.entries[0].date, d(2025, 1, 6));
    assert_eq!(parsed.row_errors.len(), 1);
    assert_eq!(parsed.row_errors[0].row, 3);
    assert_eq!(
        parsed.entries[1].day_name.as_deref(),
        Some("Coming of Age Day")
    );
    assert_eq!(parsed.entries[1].notes.as_deref(), Some("moved"));
}

#[test]
fn csv_missing_column_is_rejected() {
    let csv = "Day,Status\n2025-01-06,W\n";
    let err = parse_csv(csv.as_bytes(), &StatusMapping::default()).unwrap_err();
    assert!(matches!(err, SpreadsheetError::MissingColumn("Date")));
}
