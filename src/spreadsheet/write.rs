use super::{HEADERS, SpreadsheetError, SpreadsheetResult};
use crate::entry::{CalendarEntry, StatusMapping};
use crate::entry_validation;
use rust_xlsxwriter::{Format, Workbook};

fn validate(entries: &[CalendarEntry]) -> SpreadsheetResult<()> {
    entry_validation::validate_entry_collection(entries)
        .map_err(|err| SpreadsheetError::InvalidData(err.to_string()))
}

/// Write calendar entries as an `.xlsx` workbook. The column shape matches
/// the import format, so re-importing the output reproduces the entries.
pub fn write_workbook(
    entries: &[CalendarEntry],
    mapping: &StatusMapping,
) -> SpreadsheetResult<Vec<u8>> {
    validate(entries)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Calendar")?;

    let header_format = Format::new().set_bold();
    for (col, title) in HEADERS.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *title, &header_format)?;
    }

    for (idx, entry) in entries.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write(row, 0, entry.date.to_string())?;
        sheet.write(row, 1, mapping.token_for(entry.is_working_day))?;
        sheet.write(row, 2, entry.date.format("%a").to_string())?;
        sheet.write(row, 3, entry.day_type.as_str())?;
        sheet.write(row, 4, entry.day_name.as_deref().unwrap_or(""))?;
        sheet.write(row, 5, entry.notes.as_deref().unwrap_or(""))?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write calendar entries as CSV bytes with the same column shape as
/// [`write_workbook`].
pub fn write_csv(entries: &[CalendarEntry], mapping: &StatusMapping) -> SpreadsheetResult<Vec<u8>> {
    validate(entries)?;

    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(HEADERS)?;
        for entry in entries {
            writer.write_record([
                entry.date.to_string().as_str(),
                mapping.token_for(entry.is_working_day),
                entry.date.format("%a").to_string().as_str(),
                entry.day_type.as_str(),
                entry.day_name.as_deref().unwrap_or(""),
                entry.notes.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}
