use std::fmt;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    TimeZone,
};
use serde::{Deserialize, Serialize};

use crate::error::{ArchiverError, Result};
use crate::path_utils;

/// Format accepted for window bounds on the command line and in config files.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which file timestamp the window is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum TimeField {
    #[default]
    Modified,
    Accessed,
    Created,
}

impl TimeField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Accessed => "accessed",
            Self::Created => "created",
        }
    }

    /// Read this timestamp from `metadata`.
    ///
    /// # Errors
    /// Returns an error if the platform or filesystem does not record it.
    pub fn read(self, metadata: &Metadata) -> io::Result<DateTime<Local>> {
        let time = match self {
            Self::Modified => metadata.modified()?,
            Self::Accessed => metadata.accessed()?,
            Self::Created => metadata.created()?,
        };
        Ok(DateTime::<Local>::from(time))
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeField {
    type Err = String;

    /// Accepts the bare tag as well as legacy `tag|label` values.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let tag = s.split('|').next().unwrap_or_default().trim();
        match tag.to_lowercase().as_str() {
            "modified" | "mtime" => Ok(Self::Modified),
            "accessed" | "atime" => Ok(Self::Accessed),
            "created" | "ctime" | "birth" => Ok(Self::Created),
            _ => Err(format!("Unknown time field: {s}")),
        }
    }
}

impl TryFrom<String> for TimeField {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// What a scan job looks for: files under `source_root` whose `time_field`
/// falls inside `[window_start, window_end]`, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCriteria {
    source_root: PathBuf,
    time_field: TimeField,
    window_start: DateTime<Local>,
    window_end: DateTime<Local>,
}

impl ScanCriteria {
    /// # Errors
    /// Returns `InvalidWindow` when `window_start > window_end`, or an I/O
    /// error if `source_root` cannot be made absolute.
    pub fn new(
        source_root: &Path,
        time_field: TimeField,
        window_start: DateTime<Local>,
        window_end: DateTime<Local>,
    ) -> Result<Self> {
        if window_start > window_end {
            return Err(ArchiverError::InvalidWindow {
                start: window_start.to_rfc3339(),
                end: window_end.to_rfc3339(),
            });
        }
        let source_root = path_utils::normalize(source_root).map_err(|source| {
            ArchiverError::SourceRootUnavailable {
                path: source_root.to_path_buf(),
                source,
            }
        })?;
        Ok(Self {
            source_root,
            time_field,
            window_start,
            window_end,
        })
    }

    /// Window covering whole days: `start` from midnight through the last
    /// microsecond of `end`.
    ///
    /// # Errors
    /// See [`ScanCriteria::new`].
    pub fn for_days(
        source_root: &Path,
        time_field: TimeField,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self> {
        let (window_start, window_end) = day_window(start, end);
        Self::new(source_root, time_field, window_start, window_end)
    }

    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    #[must_use]
    pub const fn time_field(&self) -> TimeField {
        self.time_field
    }

    #[must_use]
    pub const fn window_start(&self) -> DateTime<Local> {
        self.window_start
    }

    #[must_use]
    pub const fn window_end(&self) -> DateTime<Local> {
        self.window_end
    }

    #[must_use]
    pub fn contains(&self, timestamp: DateTime<Local>) -> bool {
        self.window_start <= timestamp && timestamp <= self.window_end
    }
}

/// Parse a `YYYY-MM-DD` window bound.
///
/// # Errors
/// Returns `InvalidDate` when the value does not parse.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| {
        ArchiverError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })
}

/// The last `days` days ending at `today`.
#[must_use]
pub fn last_days(today: NaiveDate, days: u64) -> (NaiveDate, NaiveDate) {
    let start = today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN);
    (start, today)
}

/// January 1st of `today`'s year through `today`.
#[must_use]
pub fn this_year(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    (start, today)
}

fn day_window(start: NaiveDate, end: NaiveDate) -> (DateTime<Local>, DateTime<Local>) {
    let first = start.and_time(NaiveTime::MIN);
    let last = end.and_time(
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN),
    );
    (to_local(first), to_local(last))
}

const GAP_STEP_MINUTES: i64 = 15;
const GAP_SEARCH_STEPS: i64 = 12;

fn to_local(naive: NaiveDateTime) -> DateTime<Local> {
    first_valid_instant(naive, |candidate| Local.from_local_datetime(candidate))
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

/// The earlier instant on DST overlaps. Inside a DST gap, the first local time
/// after the gap (searched in 15 minute steps, at most 3 hours ahead).
fn first_valid_instant<Tz: TimeZone>(
    naive: NaiveDateTime,
    resolve: impl Fn(&NaiveDateTime) -> LocalResult<DateTime<Tz>>,
) -> Option<DateTime<Tz>> {
    (0..=GAP_SEARCH_STEPS).find_map(|step| {
        let candidate = naive.checked_add_signed(TimeDelta::minutes(step * GAP_STEP_MINUTES))?;
        resolve(&candidate).earliest()
    })
}

#[cfg(test)]
#[path = "criteria_tests.rs"]
mod tests;
