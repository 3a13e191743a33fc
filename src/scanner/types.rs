use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};

use super::ScanCriteria;

/// A file whose timestamp fell inside the scan window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Absolute path in display form.
    pub path: PathBuf,
    /// Value of the selected time field when the file was scanned.
    pub timestamp: DateTime<Local>,
}

/// Counters collected during one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Files whose timestamp was read successfully.
    pub processed: u64,
    pub errors: u64,
    pub skipped_hidden: u64,
    pub skipped_pattern: u64,
    pub skipped_size: u64,
    /// Directory branches pruned by an excluded path.
    pub skipped_by_excluded_path: u64,
}

impl ScanStats {
    #[must_use]
    pub const fn total_skipped(&self) -> u64 {
        self.skipped_hidden + self.skipped_pattern + self.skipped_size + self.skipped_by_excluded_path
    }
}

/// Output of a completed scan. Files are in traversal order.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub files: Vec<CandidateFile>,
    pub stats: ScanStats,
    pub duration: Duration,
    pub criteria: ScanCriteria,
}

impl ScanResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Completed(ScanResult),
    /// Stopped on request; nothing is published.
    Cancelled,
}
