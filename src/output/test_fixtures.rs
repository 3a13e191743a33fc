use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::config::ArchiveConfig;
use crate::mover::{MoveOutcome, MoveResult, MoveTermination};
use crate::scanner::{CandidateFile, ScanCriteria, ScanResult, ScanStats, TimeField};

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

pub fn root() -> PathBuf {
    PathBuf::from(if cfg!(windows) { r"C:\data" } else { "/data" })
}

pub fn archive_root() -> PathBuf {
    PathBuf::from(if cfg!(windows) { r"C:\archive" } else { "/archive" })
}

pub fn scan_result() -> ScanResult {
    let criteria = ScanCriteria::for_days(
        &root(),
        TimeField::Modified,
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
    )
    .unwrap();
    ScanResult {
        files: vec![
            CandidateFile {
                path: root().join("docs").join("plan.docx"),
                timestamp: at(2023, 3, 14, 9, 26, 53),
            },
            CandidateFile {
                path: root().join("notes.txt"),
                timestamp: at(2023, 11, 2, 18, 0, 0),
            },
        ],
        stats: ScanStats {
            processed: 40,
            errors: 1,
            skipped_hidden: 2,
            skipped_pattern: 3,
            skipped_size: 4,
            skipped_by_excluded_path: 1,
        },
        duration: Duration::from_millis(1500),
        criteria,
    }
}

pub fn move_result() -> MoveResult {
    MoveResult {
        outcomes: vec![
            MoveOutcome::Success {
                source: root().join("docs").join("plan.docx"),
                destination: archive_root().join("docs").join("plan.docx"),
            },
            MoveOutcome::Failure {
                source: root().join("notes.txt"),
                reason: "copy failed: permission denied".to_string(),
            },
        ],
        success_count: 1,
        error_count: 1,
        duration: Duration::from_millis(2500),
        source_root: root(),
        archive_root: archive_root(),
        termination: MoveTermination::Completed,
    }
}

pub fn config() -> ArchiveConfig {
    ArchiveConfig {
        exclude_paths: "cache".to_string(),
        ..ArchiveConfig::default()
    }
}
