use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Classification of a single calendar date.
///
/// `Regular` and `MakeupWorkday` are working classifications; `Holiday` and
/// `SpecialClosure` are non-working. The pairing with `is_working_day` is
/// enforced by the stores on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayType {
    Regular,
    Holiday,
    SpecialClosure,
    MakeupWorkday,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Regular => "regular",
            DayType::Holiday => "holiday",
            DayType::SpecialClosure => "special-closure",
            DayType::MakeupWorkday => "makeup-workday",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "regular" => Some(DayType::Regular),
            "holiday" => Some(DayType::Holiday),
            "special-closure" => Some(DayType::SpecialClosure),
            "makeup-workday" => Some(DayType::MakeupWorkday),
            _ => None,
        }
    }

    /// Whether this classification means the date is worked.
    pub fn is_working(&self) -> bool {
        matches!(self, DayType::Regular | DayType::MakeupWorkday)
    }

    /// Default classification for a bare working/non-working flag.
    pub fn default_for(is_working_day: bool) -> Self {
        if is_working_day {
            DayType::Regular
        } else {
            DayType::Holiday
        }
    }
}

/// One calendar date's working/non-working record. The date is the unique
/// key within a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub is_working_day: bool,
    pub day_type: DayType,
    pub day_name: Option<String>,
    pub notes: Option<String>,
}

impl CalendarEntry {
    pub fn new(date: NaiveDate, day_type: DayType) -> Self {
        Self {
            date,
            is_working_day: day_type.is_working(),
            day_type,
            day_name: None,
            notes: None,
        }
    }

    pub fn working(date: NaiveDate) -> Self {
        Self::new(date, DayType::Regular)
    }

    pub fn holiday(date: NaiveDate) -> Self {
        Self::new(date, DayType::Holiday)
    }

    pub fn with_day_name(mut self, name: impl Into<String>) -> Self {
        self.day_name = Some(name.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }
}

/// Status-token configuration for the spreadsheet format.
///
/// The source files mark each date with one of two tokens ("working" /
/// "non-working"). The concrete tokens vary between calendar exports, so
/// the mapping is configuration rather than a hardcoded comparison. The
/// canonical pair is used when writing; extra aliases are accepted when
/// reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMapping {
    working_token: String,
    non_working_token: String,
    #[serde(default)]
    aliases: BTreeMap<String, bool>,
}

impl Default for StatusMapping {
    fn default() -> Self {
        Self::new("W", "H")
    }
}

impl StatusMapping {
    pub fn new(working_token: impl Into<String>, non_working_token: impl Into<String>) -> Self {
        Self {
            working_token: working_token.into(),
            non_working_token: non_working_token.into(),
            aliases: BTreeMap::new(),
        }
    }

    /// Register an extra token accepted on input only.
    pub fn with_alias(mut self, token: impl Into<String>, is_working_day: bool) -> Self {
        self.aliases.insert(token.into(), is_working_day);
        self
    }

    /// Resolve a status token to a working flag. `None` means the token is
    /// not recognized.
    pub fn classify(&self, token: &str) -> Option<bool> {
        if token == self.working_token {
            return Some(true);
        }
        if token == self.non_working_token {
            return Some(false);
        }
        self.aliases.get(token).copied()
    }

    /// Canonical token written on export.
    pub fn token_for(&self, is_working_day: bool) -> &str {
        if is_working_day {
            &self.working_token
        } else {
            &self.non_working_token
        }
    }
}
