use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::scanner::{ExclusionRules, TimeField};

pub const DEFAULT_EXCLUDE_FILES: &str = "*.tmp, *.log, Thumbs.db, desktop.ini, ~*.*";
pub const DEFAULT_EXCLUDE_DIRS: &str = "node_modules, .git, .svn, __pycache__, bin, obj, build, dist";
pub const DEFAULT_MIN_SIZE_KB: u64 = 10;

/// Persisted archiver settings.
///
/// Every field has a default, so partial files load; unknown keys are ignored.
/// Field names match the settings file written by earlier releases, which lets
/// an old `archive_helper_config.json` be passed straight to `--config`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Folder to scan. Empty strings load as `None`.
    #[serde(
        deserialize_with = "empty_path_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_folder: Option<PathBuf>,

    /// Folder that receives archived files.
    #[serde(
        deserialize_with = "empty_path_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub archive_folder: Option<PathBuf>,

    /// Timestamp matched against the window.
    pub time_type: TimeField,

    /// Skip hidden files and prune hidden directories.
    pub skip_hidden: bool,

    /// Comma-separated file name globs.
    pub exclude_files: String,

    /// Comma-separated directory name globs.
    pub exclude_dirs: String,

    /// Comma-separated directory paths, absolute or relative to the source folder.
    pub exclude_paths: String,

    /// Enable the minimum-size filter.
    pub exclude_small: bool,

    /// Minimum size in KiB when `exclude_small` is set.
    pub min_size_kb: u64,

    /// Write a narrative `.txt` next to every JSON report.
    pub save_txt_report: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            source_folder: None,
            archive_folder: None,
            time_type: TimeField::Modified,
            skip_hidden: true,
            exclude_files: DEFAULT_EXCLUDE_FILES.to_string(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.to_string(),
            exclude_paths: String::new(),
            exclude_small: false,
            min_size_kb: DEFAULT_MIN_SIZE_KB,
            save_txt_report: true,
        }
    }
}

impl ArchiveConfig {
    /// Exclusion settings in the raw form the scanner compiles.
    #[must_use]
    pub fn exclusion_rules(&self) -> ExclusionRules<'_> {
        ExclusionRules {
            skip_hidden: self.skip_hidden,
            exclude_files: &self.exclude_files,
            exclude_dirs: &self.exclude_dirs,
            exclude_paths: &self.exclude_paths,
            min_size_kb: self.exclude_small.then_some(self.min_size_kb),
        }
    }
}

fn empty_path_as_none<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from))
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
