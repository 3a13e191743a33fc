//! Structured report schemas.
//!
//! The types are public and round-trip through `serde_json`, so other tools
//! can read the reports this crate writes.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::mover::{MoveOutcome, MoveResult};
use crate::path_utils;
use crate::scanner::{ScanResult, TimeField};

use super::{ReportContext, ReportFormatter};

/// Exclusion settings a report was produced with, as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub skip_hidden: bool,
    pub exclude_files: String,
    pub exclude_dirs: String,
    pub exclude_paths: String,
    pub exclude_small: bool,
    pub min_size_kb: u64,
}

impl From<&ArchiveConfig> for SearchParams {
    fn from(config: &ArchiveConfig) -> Self {
        Self {
            skip_hidden: config.skip_hidden,
            exclude_files: config.exclude_files.clone(),
            exclude_dirs: config.exclude_dirs.clone(),
            exclude_paths: config.exclude_paths.clone(),
            exclude_small: config.exclude_small,
            min_size_kb: config.min_size_kb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStatistics {
    /// Directory branches pruned by an excluded path.
    pub skipped_by_path: u64,
    #[serde(default)]
    pub processed: u64,
    #[serde(default)]
    pub errors: u64,
    #[serde(default)]
    pub skipped_hidden: u64,
    #[serde(default)]
    pub skipped_pattern: u64,
    #[serde(default)]
    pub skipped_size: u64,
    #[serde(default)]
    pub duration_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub generated: DateTime<Local>,
    pub source_folder: String,
    pub time_type: TimeField,
    pub period_start: DateTime<Local>,
    pub period_end: DateTime<Local>,
    pub total_found: usize,
    pub search_params: SearchParams,
    pub statistics: ScanStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanFileEntry {
    pub path: String,
    pub date: DateTime<Local>,
}

/// Report of a completed scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub metadata: ScanMetadata,
    pub files: Vec<ScanFileEntry>,
}

impl ScanReport {
    #[must_use]
    pub fn new(result: &ScanResult, context: &ReportContext<'_>) -> Self {
        let stats = result.stats;
        let criteria = &result.criteria;
        Self {
            metadata: ScanMetadata {
                generated: context.generated,
                source_folder: display_string(criteria.source_root()),
                time_type: criteria.time_field(),
                period_start: criteria.window_start(),
                period_end: criteria.window_end(),
                total_found: result.files.len(),
                search_params: SearchParams::from(context.config),
                statistics: ScanStatistics {
                    skipped_by_path: stats.skipped_by_excluded_path,
                    processed: stats.processed,
                    errors: stats.errors,
                    skipped_hidden: stats.skipped_hidden,
                    skipped_pattern: stats.skipped_pattern,
                    skipped_size: stats.skipped_size,
                    duration_secs: result.duration.as_secs_f64(),
                },
            },
            files: result
                .files
                .iter()
                .map(|file| ScanFileEntry {
                    path: display_string(&file.path),
                    date: file.timestamp,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MoveStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveMetadata {
    pub generated: DateTime<Local>,
    pub source_folder: String,
    pub archive_folder: String,
    pub total_files: usize,
    pub success_count: usize,
    pub error_count: usize,
    #[serde(default)]
    pub duration_secs: f64,
    /// `completed`, `cancelled` or `fatal`.
    #[serde(default)]
    pub termination: String,
    pub search_params: SearchParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFileEntry {
    pub source_path: String,
    pub archive_path: Option<String>,
    pub status: MoveStatus,
    pub error_message: Option<String>,
}

impl From<&MoveOutcome> for MoveFileEntry {
    fn from(outcome: &MoveOutcome) -> Self {
        match outcome {
            MoveOutcome::Success {
                source,
                destination,
            } => Self {
                source_path: display_string(source),
                archive_path: Some(display_string(destination)),
                status: MoveStatus::Success,
                error_message: None,
            },
            MoveOutcome::Failure { source, reason } => Self {
                source_path: display_string(source),
                archive_path: None,
                status: MoveStatus::Error,
                error_message: Some(reason.clone()),
            },
        }
    }
}

/// Report of a move job, including partial ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveReport {
    pub metadata: MoveMetadata,
    pub files: Vec<MoveFileEntry>,
}

impl MoveReport {
    #[must_use]
    pub fn new(result: &MoveResult, context: &ReportContext<'_>) -> Self {
        Self {
            metadata: MoveMetadata {
                generated: context.generated,
                source_folder: display_string(&result.source_root),
                archive_folder: display_string(&result.archive_root),
                total_files: result.outcomes.len(),
                success_count: result.success_count,
                error_count: result.error_count,
                duration_secs: result.duration.as_secs_f64(),
                termination: result.termination.as_str().to_string(),
                search_params: SearchParams::from(context.config),
            },
            files: result.outcomes.iter().map(MoveFileEntry::from).collect(),
        }
    }
}

fn display_string(path: &std::path::Path) -> String {
    path_utils::display(path).to_string_lossy().into_owned()
}

pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format_scan(&self, result: &ScanResult, context: &ReportContext<'_>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&ScanReport::new(result, context))?)
    }

    fn format_move(&self, result: &MoveResult, context: &ReportContext<'_>) -> Result<String> {
        Ok(serde_json::to_string_pretty(&MoveReport::new(result, context))?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
