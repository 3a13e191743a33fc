use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::job::{JobEvent, JobKind};

const SCAN_TEMPLATE: &str = "{spinner:.green} Scanning... {pos} files checked {msg}";
const MOVE_TEMPLATE: &str =
    "{spinner:.green} Archiving [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}";

/// Progress display for a running job, fed from its event stream.
///
/// Scans show a spinner with the processed count; moves show a bar. The
/// display is hidden in quiet mode or when stderr is not a TTY.
#[derive(Clone)]
pub struct JobProgress {
    progress_bar: ProgressBar,
}

impl JobProgress {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self::new_with_visibility(quiet, std::io::stderr().is_terminal())
    }

    fn new_with_visibility(quiet: bool, is_tty: bool) -> Self {
        let progress_bar = if quiet || !is_tty {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        Self { progress_bar }
    }

    /// Update the display for one job event.
    pub fn handle(&self, event: &JobEvent) {
        match event {
            JobEvent::Started { kind } => self.start(*kind),
            JobEvent::ScanProgress { processed } => self.progress_bar.set_position(*processed),
            JobEvent::MoveProgress { index, total } | JobEvent::FileMoved { index, total, .. } => {
                self.progress_bar.set_length(*total as u64);
                self.progress_bar.set_position(*index as u64);
            }
            JobEvent::EntryError { path, .. } => {
                self.progress_bar.set_message(format!("(unreadable: {path})"));
            }
            JobEvent::MoveFailed { source, .. } => {
                self.progress_bar
                    .set_message(format!("(failed: {})", source.display()));
            }
            JobEvent::Finished { .. } => self.finish(),
        }
    }

    /// Clear the display from the terminal.
    pub fn finish(&self) {
        self.progress_bar.finish_and_clear();
    }

    fn start(&self, kind: JobKind) {
        let template = match kind {
            JobKind::Scan => SCAN_TEMPLATE,
            JobKind::Move => MOVE_TEMPLATE,
        };
        let style = ProgressStyle::with_template(template)
            .map(|style| style.progress_chars("█▓░"))
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        self.progress_bar.set_style(style);
        self.progress_bar.set_position(0);
        self.progress_bar.set_message("");
        self.progress_bar
            .enable_steady_tick(Duration::from_millis(120));
    }
}

#[cfg(test)]
#[path = "progress_tests.rs"]
mod tests;
