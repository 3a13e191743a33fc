mod error_output;
mod json;
mod progress;
mod summary;
mod text;

#[cfg(test)]
mod test_fixtures;

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

pub use error_output::ErrorOutput;
pub use json::{
    JsonFormatter, MoveFileEntry, MoveMetadata, MoveReport, MoveStatus, ScanFileEntry,
    ScanMetadata, ScanReport, ScanStatistics, SearchParams,
};
pub use progress::JobProgress;
pub use summary::SummaryPrinter;
pub use text::{TextFormatter, time_field_label};

use crate::config::ArchiveConfig;
use crate::error::{ArchiverError, Result};
use crate::mover::MoveResult;
use crate::scanner::ScanResult;

/// Timestamp layout used in human-readable output.
pub const DISPLAY_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Auto-detect: use colors if the stream is a TTY and `NO_COLOR` is not set
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve the mode against a concrete stream.
    #[must_use]
    pub fn enabled_for(self, stream: &impl IsTerminal) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            // Presence of NO_COLOR (any value) disables color.
            Self::Auto => std::env::var_os("NO_COLOR").is_none() && stream.is_terminal(),
        }
    }
}

/// ANSI color codes
mod ansi {
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RESET: &str = "\x1b[0m";
}

/// Everything a report needs besides the job result itself.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// Settings the job ran with.
    pub config: &'a ArchiveConfig,
    pub generated: DateTime<Local>,
}

impl<'a> ReportContext<'a> {
    #[must_use]
    pub fn now(config: &'a ArchiveConfig) -> Self {
        Self {
            config,
            generated: Local::now(),
        }
    }
}

/// Renders job results into a report document.
pub trait ReportFormatter {
    /// # Errors
    /// Returns an error if the formatting fails.
    fn format_scan(&self, result: &ScanResult, context: &ReportContext<'_>) -> Result<String>;

    /// # Errors
    /// Returns an error if the formatting fails.
    fn format_move(&self, result: &MoveResult, context: &ReportContext<'_>) -> Result<String>;
}

/// Paths of the files one report write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenReport {
    pub json: PathBuf,
    pub text: Option<PathBuf>,
}

/// Writes the JSON report and, optionally, its narrative `.txt` sibling.
#[derive(Debug, Clone, Copy)]
pub struct ReportWriter {
    save_text: bool,
}

impl ReportWriter {
    #[must_use]
    pub const fn new(save_text: bool) -> Self {
        Self { save_text }
    }

    #[must_use]
    pub fn default_scan_name(generated: DateTime<Local>) -> PathBuf {
        PathBuf::from(format!(
            "search_report_{}.json",
            generated.format("%Y%m%d_%H%M%S")
        ))
    }

    #[must_use]
    pub fn default_move_name(generated: DateTime<Local>) -> PathBuf {
        PathBuf::from(format!(
            "archive_report_{}.json",
            generated.format("%Y%m%d_%H%M%S")
        ))
    }

    /// # Errors
    /// Returns an error if a report cannot be rendered or written.
    pub fn write_scan(
        &self,
        path: &Path,
        result: &ScanResult,
        context: &ReportContext<'_>,
    ) -> Result<WrittenReport> {
        let json = JsonFormatter.format_scan(result, context)?;
        let text = if self.save_text {
            Some(TextFormatter.format_scan(result, context)?)
        } else {
            None
        };
        Self::write_pair(path, &json, text.as_deref())
    }

    /// # Errors
    /// Returns an error if a report cannot be rendered or written.
    pub fn write_move(
        &self,
        path: &Path,
        result: &MoveResult,
        context: &ReportContext<'_>,
    ) -> Result<WrittenReport> {
        let json = JsonFormatter.format_move(result, context)?;
        let text = if self.save_text {
            Some(TextFormatter.format_move(result, context)?)
        } else {
            None
        };
        Self::write_pair(path, &json, text.as_deref())
    }

    fn write_pair(path: &Path, json: &str, text: Option<&str>) -> Result<WrittenReport> {
        write_file(path, json)?;
        let text = match text {
            Some(content) => {
                let sibling = text_sibling(path);
                write_file(&sibling, content)?;
                Some(sibling)
            }
            None => None,
        };
        tracing::info!(path = %path.display(), "Report written");
        Ok(WrittenReport {
            json: path.to_path_buf(),
            text,
        })
    }
}

/// The narrative report path for a JSON report path.
///
/// A `.json` extension is swapped for `.txt`; any other name gets `.txt`
/// appended so the two files never collide.
#[must_use]
pub fn text_sibling(json_path: &Path) -> PathBuf {
    let is_json = json_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        json_path.with_extension("txt")
    } else {
        let mut name = json_path.as_os_str().to_os_string();
        name.push(".txt");
        PathBuf::from(name)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ArchiverError::FileAccess {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| ArchiverError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
