use crate::entry::{CalendarEntry, DayType};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone)]
pub struct EntryValidationError {
    message: String,
}

impl EntryValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EntryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EntryValidationError {}

pub fn validate_entry(entry: &CalendarEntry) -> Result<(), EntryValidationError> {
    match entry.day_type {
        DayType::Holiday | DayType::SpecialClosure => {
            if entry.is_working_day {
                return Err(EntryValidationError::new(format!(
                    "{} is typed {} but flagged as a working day",
                    entry.date,
                    entry.day_type.as_str()
                )));
            }
        }
        DayType::Regular | DayType::MakeupWorkday => {
            if !entry.is_working_day {
                return Err(EntryValidationError::new(format!(
                    "{} is typed {} but flagged as a non-working day",
                    entry.date,
                    entry.day_type.as_str()
                )));
            }
        }
    }

    if let Some(name) = &entry.day_name {
        if name.trim().is_empty() {
            return Err(EntryValidationError::new(format!(
                "{} has a blank day_name (omit the field instead)",
                entry.date
            )));
        }
    }

    Ok(())
}

pub fn validate_entry_collection(entries: &[CalendarEntry]) -> Result<(), EntryValidationError> {
    let mut seen_dates = HashSet::with_capacity(entries.len());
    for entry in entries {
        if !seen_dates.insert(entry.date) {
            return Err(EntryValidationError::new(format!(
                "duplicate calendar date {}",
                entry.date
            )));
        }
        validate_entry(entry)?;
    }
    Ok(())
}
