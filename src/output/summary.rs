use std::io::Write;

use crate::mover::{MoveOutcome, MoveResult, MoveTermination};
use crate::scanner::ScanResult;

use super::{ColorMode, DISPLAY_DATE_FORMAT, WrittenReport, ansi, time_field_label};

/// Number of found files listed after a scan.
pub const SAMPLE_SIZE: usize = 5;

/// Console summaries printed after each job.
pub struct SummaryPrinter {
    use_colors: bool,
}

impl SummaryPrinter {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self {
            use_colors: mode.enabled_for(&std::io::stdout()),
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{}", ansi::RESET)
        } else {
            text.to_string()
        }
    }

    /// Counts line followed by up to [`SAMPLE_SIZE`] found files.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_scan<W: Write>(&self, w: &mut W, result: &ScanResult) -> std::io::Result<()> {
        let stats = &result.stats;
        writeln!(
            w,
            "{} {} files found in {} ({} processed, {} skipped, {} errors, {:.1}s)",
            self.paint(ansi::GREEN, "✓"),
            result.files.len(),
            result.criteria.source_root().display(),
            stats.processed,
            stats.total_skipped(),
            stats.errors,
            result.duration.as_secs_f64(),
        )?;
        writeln!(
            w,
            "  {} between {} and {}",
            time_field_label(result.criteria.time_field()),
            result.criteria.window_start().format(DISPLAY_DATE_FORMAT),
            result.criteria.window_end().format(DISPLAY_DATE_FORMAT),
        )?;
        for file in result.files.iter().take(SAMPLE_SIZE) {
            writeln!(
                w,
                "  {}  {}",
                self.paint(ansi::DIM, &file.timestamp.format(DISPLAY_DATE_FORMAT).to_string()),
                file.path.display()
            )?;
        }
        let rest = result.files.len().saturating_sub(SAMPLE_SIZE);
        if rest > 0 {
            writeln!(w, "  ... and {rest} more")?;
        }
        Ok(())
    }

    /// Every file a move would touch, for dry runs.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_dry_run<W: Write>(
        &self,
        w: &mut W,
        result: &ScanResult,
        archive_root: &std::path::Path,
    ) -> std::io::Result<()> {
        writeln!(
            w,
            "{} Dry run: {} files would be moved to {}",
            self.paint(ansi::YELLOW, "⚠"),
            result.files.len(),
            archive_root.display()
        )?;
        for file in &result.files {
            writeln!(w, "  {}", file.path.display())?;
        }
        writeln!(w, "Pass --yes to move them.")
    }

    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_move<W: Write>(&self, w: &mut W, result: &MoveResult) -> std::io::Result<()> {
        let mark = if result.is_clean() {
            self.paint(ansi::GREEN, "✓")
        } else {
            self.paint(ansi::RED, "✗")
        };
        writeln!(
            w,
            "{mark} {} moved, {} failed ({:.1}s) -> {}",
            result.success_count,
            result.error_count,
            result.duration.as_secs_f64(),
            result.archive_root.display()
        )?;
        for outcome in &result.outcomes {
            if let MoveOutcome::Failure { source, reason } = outcome {
                writeln!(
                    w,
                    "  {} {}: {reason}",
                    self.paint(ansi::RED, "✗"),
                    source.display()
                )?;
            }
        }
        match &result.termination {
            MoveTermination::Completed => {}
            MoveTermination::Cancelled => {
                writeln!(w, "{}", self.paint(ansi::YELLOW, "Cancelled; remaining files were left in place."))?;
            }
            MoveTermination::Fatal(reason) => {
                writeln!(w, "{} {reason}", self.paint(ansi::RED, "Stopped:"))?;
            }
        }
        Ok(())
    }

    /// # Errors
    /// Returns an error if writing fails.
    pub fn write_report_paths<W: Write>(
        &self,
        w: &mut W,
        written: &WrittenReport,
    ) -> std::io::Result<()> {
        writeln!(w, "Report: {}", written.json.display())?;
        if let Some(text) = &written.text {
            writeln!(w, "Report: {}", text.display())?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub const fn plain() -> Self {
        Self { use_colors: false }
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
