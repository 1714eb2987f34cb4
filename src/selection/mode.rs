//! Selection modes and their lookup tables.
//!
//! A mode has three external representations, each kept as its own table:
//! the integer persisted in settings, the row it occupies in a mode picker,
//! and the name used on the command line. The persisted integers predate the
//! picker order, so the two do not line up.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::store::DateFilter;

/// Rule deciding which songs are offered for sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// Songs added before/after/between the stored dates
    AddedDate,
    /// Songs in no playlist at all
    InNoPlaylist,
    /// Songs in none of the destination playlists
    InNoDestination,
    /// Songs in none of the excluded playlists
    NotInPlaylists,
    /// Songs in at least one of the included playlists
    InPlaylists,
    /// Whole library
    AllSongs,
    /// Editing the destination playlists; selects nothing
    Destination,
}

/// How [`SelectionMode::AddedDate`] uses the stored dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSelectionMode {
    Before,
    After,
    Range,
}

const MODE_STORAGE: [(SelectionMode, i64); 7] = [
    (SelectionMode::AddedDate, 5),
    (SelectionMode::InNoPlaylist, 0),
    (SelectionMode::InNoDestination, 1),
    (SelectionMode::NotInPlaylists, 2),
    (SelectionMode::InPlaylists, 3),
    (SelectionMode::AllSongs, 4),
    (SelectionMode::Destination, -1),
];

/// Picker order. [`SelectionMode::Destination`] has no row.
const MODE_ROWS: [SelectionMode; 6] = [
    SelectionMode::AddedDate,
    SelectionMode::InNoPlaylist,
    SelectionMode::InNoDestination,
    SelectionMode::NotInPlaylists,
    SelectionMode::InPlaylists,
    SelectionMode::AllSongs,
];

const MODE_NAMES: [(SelectionMode, &str); 7] = [
    (SelectionMode::AddedDate, "added-date"),
    (SelectionMode::InNoPlaylist, "in-no-playlist"),
    (SelectionMode::InNoDestination, "in-no-destination"),
    (SelectionMode::NotInPlaylists, "not-in-playlists"),
    (SelectionMode::InPlaylists, "in-playlists"),
    (SelectionMode::AllSongs, "all-songs"),
    (SelectionMode::Destination, "destination"),
];

const DATE_MODE_STORAGE: [(DateSelectionMode, i64); 3] = [
    (DateSelectionMode::Before, 0),
    (DateSelectionMode::After, 1),
    (DateSelectionMode::Range, 2),
];

const DATE_MODE_NAMES: [(DateSelectionMode, &str); 3] = [
    (DateSelectionMode::Before, "before"),
    (DateSelectionMode::After, "after"),
    (DateSelectionMode::Range, "range"),
];

/// Settings value for a mode.
pub fn storage_value(mode: SelectionMode) -> i64 {
    MODE_STORAGE
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, v)| *v)
        .unwrap_or(-1)
}

/// Mode for a settings value.
pub fn mode_from_storage(value: i64) -> Option<SelectionMode> {
    MODE_STORAGE
        .iter()
        .find(|(_, v)| *v == value)
        .map(|(m, _)| *m)
}

/// Picker row of a mode.
pub fn row_index(mode: SelectionMode) -> Option<usize> {
    MODE_ROWS.iter().position(|m| *m == mode)
}

/// Mode shown at a picker row.
pub fn mode_for_row(row: usize) -> Option<SelectionMode> {
    MODE_ROWS.get(row).copied()
}

/// Settings value for a date mode.
pub fn date_storage_value(mode: DateSelectionMode) -> i64 {
    DATE_MODE_STORAGE
        .iter()
        .find(|(m, _)| *m == mode)
        .map(|(_, v)| *v)
        .unwrap_or(1)
}

/// Date mode for a settings value.
pub fn date_mode_from_storage(value: i64) -> Option<DateSelectionMode> {
    DATE_MODE_STORAGE
        .iter()
        .find(|(_, v)| *v == value)
        .map(|(m, _)| *m)
}

/// Error for unrecognized mode names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode: {input} (expected one of: {expected})")]
pub struct ModeParseError {
    pub input: String,
    pub expected: String,
}

fn parse_named<T: Copy>(table: &[(T, &str)], input: &str) -> Result<T, ModeParseError> {
    let wanted = input.trim().to_lowercase().replace('_', "-");
    table
        .iter()
        .find(|(_, name)| *name == wanted)
        .map(|(value, _)| *value)
        .ok_or_else(|| ModeParseError {
            input: input.to_string(),
            expected: table
                .iter()
                .map(|(_, name)| *name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn name_of<T: PartialEq>(table: &[(T, &'static str)], value: &T) -> &'static str {
    table
        .iter()
        .find(|(v, _)| v == value)
        .map(|(_, name)| *name)
        .unwrap_or("?")
}

impl FromStr for SelectionMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&MODE_NAMES, s)
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", name_of(&MODE_NAMES, self))
    }
}

impl FromStr for DateSelectionMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&DATE_MODE_NAMES, s)
    }
}

impl fmt::Display for DateSelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", name_of(&DATE_MODE_NAMES, self))
    }
}

/// Stored settings for [`SelectionMode::AddedDate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSelection {
    pub mode: DateSelectionMode,
    /// Pivot for `Before`/`After`, start of a `Range`
    pub date: DateTime<Utc>,
    /// End of a `Range`
    pub until: DateTime<Utc>,
    /// Order "after" selections by added date so a restarted session
    /// resumes where it left off
    pub stable_order: bool,
}

impl DateSelection {
    /// The store query constraint. Reversed range bounds are swapped.
    pub fn filter(&self) -> DateFilter {
        match self.mode {
            DateSelectionMode::Before => DateFilter::Before(self.date),
            DateSelectionMode::After => DateFilter::After(self.date),
            DateSelectionMode::Range => DateFilter::Between(
                self.date.min(self.until),
                self.date.max(self.until),
            ),
        }
    }

    /// Whether added-date results are ordered chronologically.
    pub fn keeps_stable_order(&self) -> bool {
        self.mode == DateSelectionMode::After && self.stable_order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_storage_values() {
        assert_eq!(storage_value(SelectionMode::AddedDate), 5);
        assert_eq!(storage_value(SelectionMode::InNoPlaylist), 0);
        assert_eq!(storage_value(SelectionMode::AllSongs), 4);
        assert_eq!(storage_value(SelectionMode::Destination), -1);

        for (mode, value) in MODE_STORAGE {
            assert_eq!(mode_from_storage(value), Some(mode));
        }
        assert_eq!(mode_from_storage(42), None);
    }

    #[test]
    fn test_rows_differ_from_storage() {
        assert_eq!(row_index(SelectionMode::AddedDate), Some(0));
        assert_eq!(row_index(SelectionMode::InNoPlaylist), Some(1));
        assert_eq!(row_index(SelectionMode::AllSongs), Some(5));
        assert_eq!(row_index(SelectionMode::Destination), None);

        assert_eq!(mode_for_row(0), Some(SelectionMode::AddedDate));
        assert_eq!(mode_for_row(4), Some(SelectionMode::InPlaylists));
        assert_eq!(mode_for_row(6), None);
    }

    #[test]
    fn test_date_mode_storage() {
        assert_eq!(date_storage_value(DateSelectionMode::Before), 0);
        assert_eq!(date_storage_value(DateSelectionMode::After), 1);
        assert_eq!(date_storage_value(DateSelectionMode::Range), 2);
        assert_eq!(date_mode_from_storage(2), Some(DateSelectionMode::Range));
        assert_eq!(date_mode_from_storage(-4), None);
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(
            "all-songs".parse::<SelectionMode>(),
            Ok(SelectionMode::AllSongs)
        );
        assert_eq!(
            "In_No_Destination".parse::<SelectionMode>(),
            Ok(SelectionMode::InNoDestination)
        );
        assert_eq!(SelectionMode::AddedDate.to_string(), "added-date");
        assert_eq!("range".parse::<DateSelectionMode>(), Ok(DateSelectionMode::Range));

        let err = "shuffle".parse::<SelectionMode>().unwrap_err();
        assert!(err.to_string().contains("all-songs"));
    }

    #[test]
    fn test_date_filter() {
        let early = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut dates = DateSelection {
            mode: DateSelectionMode::Range,
            date: late,
            until: early,
            stable_order: true,
        };
        assert_eq!(dates.filter(), DateFilter::Between(early, late));
        assert!(!dates.keeps_stable_order());

        dates.mode = DateSelectionMode::After;
        assert_eq!(dates.filter(), DateFilter::After(late));
        assert!(dates.keeps_stable_order());

        dates.mode = DateSelectionMode::Before;
        assert_eq!(dates.filter(), DateFilter::Before(late));
    }
}
