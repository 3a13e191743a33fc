//! User-facing error and warning blocks.
//!
//! Format: `✖ Type: message`, then an optional `× detail` line and an
//! optional `help:` line.

use std::io::Write;

use crate::error::ArchiverError;

use super::ColorMode;
use super::ansi;

/// Renders errors and warnings for stderr.
pub struct ErrorOutput {
    use_colors: bool,
}

impl ErrorOutput {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self {
            use_colors: mode.enabled_for(&std::io::stderr()),
        }
    }

    /// Auto-detects color support on stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(ColorMode::Auto)
    }

    /// Print `err` with its category, cause and hint.
    pub fn report(&self, err: &ArchiverError) {
        let mut stderr = std::io::stderr().lock();
        self.write_archiver_error(&mut stderr, err);
    }

    pub fn warn(&self, message: &str, detail: Option<&str>) {
        let mut stderr = std::io::stderr().lock();
        self.write_warning(&mut stderr, message, detail, None);
    }

    pub fn write_archiver_error<W: Write>(&self, w: &mut W, err: &ArchiverError) {
        self.write_error(
            w,
            err.error_type(),
            &err.message(),
            err.detail().as_deref(),
            err.suggestion(),
        );
    }

    pub fn write_error<W: Write>(
        &self,
        w: &mut W,
        error_type: &str,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        let heading = format!("✖ {error_type}:");
        self.write_block(w, ansi::RED, &heading, message, detail, suggestion);
    }

    pub fn write_warning<W: Write>(
        &self,
        w: &mut W,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        self.write_block(w, ansi::YELLOW, "⚠ Warning:", message, detail, suggestion);
    }

    // Write failures are dropped: stderr may be closed and there is nowhere
    // left to report them.
    fn write_block<W: Write>(
        &self,
        w: &mut W,
        color: &str,
        heading: &str,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        if self.use_colors {
            let _ = writeln!(w, "{}{color}{heading}{} {message}", ansi::BOLD, ansi::RESET);
        } else {
            let _ = writeln!(w, "{heading} {message}");
        }

        if let Some(d) = detail {
            if self.use_colors {
                let _ = writeln!(w, "  {}× {d}{}", ansi::DIM, ansi::RESET);
            } else {
                let _ = writeln!(w, "  × {d}");
            }
        }

        if let Some(s) = suggestion {
            if self.use_colors {
                let _ = writeln!(w, "  {}help:{} {s}", ansi::CYAN, ansi::RESET);
            } else {
                let _ = writeln!(w, "  help: {s}");
            }
        }
    }

    #[cfg(test)]
    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl Default for ErrorOutput {
    fn default() -> Self {
        Self::stderr()
    }
}

#[cfg(test)]
#[path = "error_output_tests.rs"]
mod tests;
