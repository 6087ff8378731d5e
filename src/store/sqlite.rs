use super::{CalendarStore, StoreError, StoreResult, validate_entry};
use crate::entry::{CalendarEntry, DayType};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use std::sync::Mutex;

type RawCalendarRow = (String, String, Option<String>, bool, Option<String>);

/// SQLite-backed calendar store. Dates are stored as ISO-8601 text, which
/// keeps `BETWEEN` range scans and `ORDER BY` correct without a date type.
pub struct SqliteCalendarStore {
    connection: Mutex<Connection>,
}

impl SqliteCalendarStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> StoreResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> StoreResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS company_calendar (
                calendar_date TEXT PRIMARY KEY,
                day_type TEXT NOT NULL,
                day_name TEXT,
                is_working_day INTEGER NOT NULL,
                notes TEXT
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawCalendarRow> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    }

    fn decode((date_text, type_text, day_name, is_working_day, notes): RawCalendarRow) -> StoreResult<CalendarEntry> {
        let date = NaiveDate::parse_from_str(&date_text, "%Y-%m-%d")
            .map_err(|err| StoreError::Read(format!("bad calendar_date '{date_text}': {err}")))?;
        let day_type = DayType::from_str(&type_text)
            .ok_or_else(|| StoreError::Read(format!("unknown day_type '{type_text}'")))?;
        Ok(CalendarEntry {
            date,
            is_working_day,
            day_type,
            day_name,
            notes,
        })
    }
}

impl CalendarStore for SqliteCalendarStore {
    fn upsert(&self, entry: &CalendarEntry) -> StoreResult<()> {
        validate_entry(entry)?;
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        conn.execute(
            r#"
            INSERT INTO company_calendar
                (calendar_date, day_type, day_name, is_working_day, notes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(calendar_date) DO UPDATE SET
                day_type = excluded.day_type,
                day_name = excluded.day_name,
                is_working_day = excluded.is_working_day,
                notes = excluded.notes
            "#,
            params![
                entry.date.to_string(),
                entry.day_type.as_str(),
                entry.day_name,
                entry.is_working_day,
                entry.notes,
            ],
        )?;
        Ok(())
    }

    fn delete_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<usize> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let deleted = conn.execute(
            "DELETE FROM company_calendar WHERE calendar_date BETWEEN ?1 AND ?2",
            params![start.to_string(), end.to_string()],
        )?;
        Ok(deleted)
    }

    fn read_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<CalendarEntry>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare(
            r#"
            SELECT calendar_date, day_type, day_name, is_working_day, notes
            FROM company_calendar
            WHERE calendar_date BETWEEN ?1 AND ?2
            ORDER BY calendar_date
            "#,
        )?;
        let rows = stmt.query_map(params![start.to_string(), end.to_string()], Self::raw_row)?;

        let mut entries = Vec::new();
        for raw in rows {
            entries.push(Self::decode(raw?)?);
        }
        Ok(entries)
    }
}
