use super::{CalendarStore, StoreResult, validate_entry};
use crate::entry::CalendarEntry;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory store backed by a `BTreeMap`, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryCalendarStore {
    entries: Mutex<BTreeMap<NaiveDate, CalendarEntry>>,
}

impl MemoryCalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("calendar mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CalendarStore for MemoryCalendarStore {
    fn upsert(&self, entry: &CalendarEntry) -> StoreResult<()> {
        validate_entry(entry)?;
        let mut entries = self.entries.lock().expect("calendar mutex poisoned");
        entries.insert(entry.date, entry.clone());
        Ok(())
    }

    fn delete_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<usize> {
        if start > end {
            return Ok(0);
        }
        let mut entries = self.entries.lock().expect("calendar mutex poisoned");
        let doomed: Vec<NaiveDate> = entries.range(start..=end).map(|(date, _)| *date).collect();
        for date in &doomed {
            entries.remove(date);
        }
        Ok(doomed.len())
    }

    fn read_range(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<CalendarEntry>> {
        if start > end {
            return Ok(Vec::new());
        }
        let entries = self.entries.lock().expect("calendar mutex poisoned");
        Ok(entries.range(start..=end).map(|(_, e)| e.clone()).collect())
    }
}
