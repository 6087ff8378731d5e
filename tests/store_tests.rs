use calendar_tool::{CalendarEntry, CalendarStore, DayType, MemoryCalendarStore, StoreError};
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn upsert_replaces_the_entry_for_a_date() {
    let store = MemoryCalendarStore::new();
    store.upsert(&CalendarEntry::working(d(2025, 1, 6))).unwrap();
    store.upsert(&CalendarEntry::holiday(d(2025, 1, 6))).unwrap();

    assert_eq!(store.len(), 1);
    let entry = store.read_date(d(2025, 1, 6)).unwrap().unwrap();
    assert!(!entry.is_working_day);
}

#[test]
fn read_range_is_ordered_and_inclusive() {
    let store = MemoryCalendarStore::new();
    for day in [10, 6, 8] {
        store.upsert(&CalendarEntry::working(d(2025, 1, day))).unwrap();
    }

    let entries = store.read_range(d(2025, 1, 6), d(2025, 1, 10)).unwrap();
    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![d(2025, 1, 6), d(2025, 1, 8), d(2025, 1, 10)]);

    let entries = store.read_range(d(2025, 1, 7), d(2025, 1, 9)).unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn delete_range_returns_the_removed_count() {
    let store = MemoryCalendarStore::new();
    for day in 6..=10 {
        store.upsert(&CalendarEntry::working(d(2025, 1, day))).unwrap();
    }

    assert_eq!(store.delete_range(d(2025, 1, 7), d(2025, 1, 9)).unwrap(), 3);
    assert_eq!(store.len(), 2);
    assert_eq!(store.delete_range(d(2025, 2, 1), d(2025, 2, 28)).unwrap(), 0);

    assert!(store.delete_date(d(2025, 1, 6)).unwrap());
    assert!(!store.delete_date(d(2025, 1, 6)).unwrap());
}

#[test]
fn stores_reject_inconsistent_entries() {
    let store = MemoryCalendarStore::new();
    let mut entry = CalendarEntry::working(d(2025, 1, 6));
    entry.day_type = DayType::Holiday;

    let err = store.upsert(&entry).unwrap_err();
    assert!(matches!(err, StoreError::InvalidEntry(_)));
    assert!(store.is_empty());
}

#[test]
fn is_working_day_falls_back_to_weekday_arithmetic() {
    let store = MemoryCalendarStore::new();

    // 2025-01-08 is a Wednesday, 2025-01-11 a Saturday; neither is
    // registered.
    assert!(store.is_working_day(d(2025, 1, 8)).unwrap());
    assert!(!store.is_working_day(d(2025, 1, 11)).unwrap());

    // Registered entries override the fallback in both directions.
    store
        .upsert(&CalendarEntry::new(d(2025, 1, 11), DayType::MakeupWorkday))
        .unwrap();
    store.upsert(&CalendarEntry::holiday(d(2025, 1, 8))).unwrap();
    assert!(store.is_working_day(d(2025, 1, 11)).unwrap());
    assert!(!store.is_working_day(d(2025, 1, 8)).unwrap());
}

#[test]
fn next_working_day_skips_holidays_and_weekends() {
    let store = MemoryCalendarStore::new();

    // From Friday 2025-01-10 the next working day is Monday the 13th.
    assert_eq!(
        store.next_working_day(d(2025, 1, 10), 1).unwrap(),
        d(2025, 1, 13)
    );

    // Registering the 13th as a holiday pushes it to Tuesday.
    store.upsert(&CalendarEntry::holiday(d(2025, 1, 13))).unwrap();
    assert_eq!(
        store.next_working_day(d(2025, 1, 10), 1).unwrap(),
        d(2025, 1, 14)
    );

    // skip = 3 counts working days, not calendar days.
    assert_eq!(
        store.next_working_day(d(2025, 1, 10), 3).unwrap(),
        d(2025, 1, 16)
    );
}

#[test]
fn working_days_between_lists_registered_working_dates() {
    let store = MemoryCalendarStore::new();
    store.upsert(&CalendarEntry::working(d(2025, 1, 6))).unwrap();
    store.upsert(&CalendarEntry::holiday(d(2025, 1, 7))).unwrap();
    store.upsert(&CalendarEntry::working(d(2025, 1, 8))).unwrap();

    let days = store
        .working_days_between(d(2025, 1, 1), d(2025, 1, 31))
        .unwrap();
    assert_eq!(days, vec![d(2025, 1, 6), d(2025, 1, 8)]);
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::d;
    use calendar_tool::{CalendarEntry, CalendarStore, DayType, SqliteCalendarStore, StoreError};

    #[test]
    fn upsert_and_read_back() {
        let store = SqliteCalendarStore::in_memory().unwrap();
        let entry = CalendarEntry::holiday(d(2025, 1, 1))
            .with_day_name("New Year's Day")
            .with_notes("company-wide");
        store.upsert(&entry).unwrap();
        store.upsert(&CalendarEntry::working(d(2025, 1, 6))).unwrap();

        let entries = store.read_range(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entry);
        assert!(entries[1].is_working_day);
    }

    #[test]
    fn upsert_replaces_by_date() {
        let store = SqliteCalendarStore::in_memory().unwrap();
        store.upsert(&CalendarEntry::working(d(2025, 1, 6))).unwrap();
        store
            .upsert(&CalendarEntry::new(d(2025, 1, 6), DayType::SpecialClosure))
            .unwrap();

        let entries = store.read_range(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].day_type, DayType::SpecialClosure);
    }

    #[test]
    fn delete_range_counts_rows() {
        let store = SqliteCalendarStore::in_memory().unwrap();
        for day in 6..=10 {
            store.upsert(&CalendarEntry::working(d(2025, 1, day))).unwrap();
        }
        assert_eq!(store.delete_range(d(2025, 1, 7), d(2025, 1, 9)).unwrap(), 3);
        assert_eq!(
            store.read_range(d(2025, 1, 1), d(2025, 1, 31)).unwrap().len(),
            2
        );
    }

    #[test]
    fn rejects_inconsistent_entries() {
        let store = SqliteCalendarStore::in_memory().unwrap();
        let mut entry = CalendarEntry::holiday(d(2025, 1, 1));
        entry.is_working_day = true;
        assert!(matches!(
            store.upsert(&entry).unwrap_err(),
            StoreError::InvalidEntry(_)
        ));
    }

    #[test]
    fn entries_survive_reopening_the_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let entry = CalendarEntry::holiday(d(2025, 5, 5)).with_day_name("Children's Day");

        {
            let store = SqliteCalendarStore::new(file.path()).unwrap();
            store.upsert(&entry).unwrap();
        }

        let store = SqliteCalendarStore::new(file.path()).unwrap();
        let entries = store.read_range(d(2025, 1, 1), d(2025, 12, 31)).unwrap();
        assert_eq!(entries, vec![entry]);
    }
}
