use std::fmt::Write;

use crate::config::ArchiveConfig;
use crate::error::Result;
use crate::mover::{MoveOutcome, MoveResult, MoveTermination};
use crate::scanner::{ScanResult, SYSTEM_DIRS, TimeField, split_list};

use super::{DISPLAY_DATE_FORMAT, ReportContext, ReportFormatter};

const WIDTH: usize = 80;
const PERIOD_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Human-readable label for a time field.
#[must_use]
pub const fn time_field_label(field: TimeField) -> &'static str {
    match field {
        TimeField::Modified => "Last modified",
        TimeField::Accessed => "Last accessed",
        TimeField::Created => "Created",
    }
}

/// Fixed-width narrative reports, one stanza per file.
pub struct TextFormatter;

impl TextFormatter {
    fn heavy_rule(out: &mut String) {
        let _ = writeln!(out, "{}", "=".repeat(WIDTH));
    }

    fn light_rule(out: &mut String) {
        let _ = writeln!(out, "{}", "-".repeat(WIDTH));
    }

    fn title(out: &mut String, title: &str) {
        Self::heavy_rule(out);
        let _ = writeln!(out, "{title}");
        Self::heavy_rule(out);
    }

    fn exclusion_parameters(out: &mut String, heading: &str, config: &ArchiveConfig) {
        let _ = writeln!(out, "\n{heading}:");
        let _ = writeln!(
            out,
            "  Skip hidden: {}",
            if config.skip_hidden { "yes" } else { "no" }
        );
        let _ = writeln!(out, "  File patterns: {}", config.exclude_files);
        let _ = writeln!(out, "  Directory patterns: {}", config.exclude_dirs);
        let _ = writeln!(out, "  Excluded directory paths:");
        let paths = split_list(&config.exclude_paths);
        if paths.is_empty() {
            let _ = writeln!(out, "    (none)");
        }
        for path in paths {
            let _ = writeln!(out, "    - {path}");
        }
        if config.exclude_small {
            let _ = writeln!(out, "  Skip files smaller than: {} KB", config.min_size_kb);
        } else {
            let _ = writeln!(out, "  Skip files smaller than: off");
        }
        let _ = writeln!(
            out,
            "  System directories ({}) are always excluded",
            SYSTEM_DIRS.join(", ")
        );
    }

    const fn termination_label(termination: &MoveTermination) -> &'static str {
        match termination {
            MoveTermination::Completed => "completed",
            MoveTermination::Cancelled => "cancelled by user",
            MoveTermination::Fatal(_) => "stopped",
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format_scan(&self, result: &ScanResult, context: &ReportContext<'_>) -> Result<String> {
        let mut out = String::new();
        let criteria = &result.criteria;
        let stats = &result.stats;

        Self::title(&mut out, "FOUND FILES REPORT (scan)");
        let _ = writeln!(
            out,
            "Generated: {}",
            context.generated.format(DISPLAY_DATE_FORMAT)
        );
        let _ = writeln!(out, "Source folder: {}", criteria.source_root().display());
        let _ = writeln!(
            out,
            "Time field: {}",
            time_field_label(criteria.time_field())
        );
        let _ = writeln!(
            out,
            "Period: {} to {}",
            criteria.window_start().format(PERIOD_FORMAT),
            criteria.window_end().format(PERIOD_FORMAT)
        );
        let _ = writeln!(out, "Files found: {}", result.files.len());

        Self::exclusion_parameters(&mut out, "EXCLUSION PARAMETERS", context.config);

        let _ = writeln!(out, "\nSTATISTICS:");
        let _ = writeln!(out, "  Files processed: {}", stats.processed);
        let _ = writeln!(out, "  Skipped hidden: {}", stats.skipped_hidden);
        let _ = writeln!(out, "  Skipped by pattern: {}", stats.skipped_pattern);
        let _ = writeln!(out, "  Skipped by size: {}", stats.skipped_size);
        let _ = writeln!(
            out,
            "  Skipped by path: {} directories (whole branch)",
            stats.skipped_by_excluded_path
        );
        let _ = writeln!(out, "  Errors: {}", stats.errors);
        let _ = writeln!(out, "  Duration: {:.1} s", result.duration.as_secs_f64());
        Self::heavy_rule(&mut out);

        let _ = writeln!(out, "\nNOTE: this report only lists found files. Nothing was moved.");
        let _ = writeln!(out, "Run the archive command to move them.\n");
        Self::light_rule(&mut out);
        for file in &result.files {
            let _ = writeln!(out, "Path: {}", file.path.display());
            let _ = writeln!(out, "Date: {}", file.timestamp.format(DISPLAY_DATE_FORMAT));
            Self::light_rule(&mut out);
        }
        Ok(out)
    }

    fn format_move(&self, result: &MoveResult, context: &ReportContext<'_>) -> Result<String> {
        let mut out = String::new();

        Self::title(&mut out, "ARCHIVE MOVE REPORT");
        let _ = writeln!(
            out,
            "Generated: {}",
            context.generated.format(DISPLAY_DATE_FORMAT)
        );
        let _ = writeln!(out, "Source folder: {}", result.source_root.display());
        let _ = writeln!(out, "Archive folder: {}", result.archive_root.display());
        let _ = writeln!(out, "Duration: {:.1} s", result.duration.as_secs_f64());
        let _ = writeln!(out, "Total files: {}", result.outcomes.len());
        let _ = writeln!(out, "Moved: {}", result.success_count);
        let _ = writeln!(out, "Errors: {}", result.error_count);
        let _ = writeln!(
            out,
            "Result: {}",
            Self::termination_label(&result.termination)
        );
        if let MoveTermination::Fatal(reason) = &result.termination {
            let _ = writeln!(out, "Stop reason: {reason}");
        }

        Self::exclusion_parameters(&mut out, "SCAN EXCLUSION PARAMETERS", context.config);
        Self::heavy_rule(&mut out);

        let _ = writeln!(out, "\nPER-FILE DETAILS:");
        Self::light_rule(&mut out);
        for outcome in &result.outcomes {
            match outcome {
                MoveOutcome::Success {
                    source,
                    destination,
                } => {
                    let _ = writeln!(out, "Status: SUCCESS");
                    let _ = writeln!(out, "Source path: {}", source.display());
                    let _ = writeln!(out, "Archive path: {}", destination.display());
                }
                MoveOutcome::Failure { source, reason } => {
                    let _ = writeln!(out, "Status: ERROR");
                    let _ = writeln!(out, "Source path: {}", source.display());
                    let _ = writeln!(out, "Error: {reason}");
                }
            }
            Self::light_rule(&mut out);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
