mod criteria;
mod exclusion;
mod hidden;
mod metadata;
mod types;

pub use criteria::{DATE_FORMAT, ScanCriteria, TimeField, last_days, parse_date, this_year};
pub use exclusion::{ExclusionConfig, ExclusionRules, SYSTEM_DIRS, split_list};
pub use hidden::{HiddenProbe, NativeHiddenProbe, NeverHidden};
pub use metadata::{FsMetadata, MetadataReader};
pub use types::{CandidateFile, ScanOutcome, ScanResult, ScanStats};

use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;

use walkdir::{DirEntry, WalkDir};

use crate::error::{ArchiverError, Result};
use crate::job::{CancelToken, EventSink, JobEvent};
use crate::path_utils::{self, truncate_chars};

/// A progress event is emitted every this many processed files.
pub const PROGRESS_INTERVAL: u64 = 200;

/// Entry errors beyond this count are only counted, not published.
pub const MAX_REPORTED_ERRORS: u64 = 5;

const ERROR_PATH_CHARS: usize = 80;
const ERROR_MESSAGE_CHARS: usize = 60;

/// Walks the source tree once, top-down, and collects files matching the
/// criteria that survive the exclusion rules.
///
/// Per directory, child names matching a directory pattern are pruned
/// silently, then hidden children are pruned (and counted) when
/// `skip_hidden` is set. A directory that is visited is checked against the
/// excluded path prefixes before anything below it is read.
///
/// Per file the checks run in this order: name pattern, hidden, size,
/// timestamp read, window match. Symlinks to files are scanned through their
/// target; links to directories are listed but never entered, and dangling
/// links count as entry errors.
pub struct Scanner<P: HiddenProbe = NativeHiddenProbe, M: MetadataReader = FsMetadata> {
    criteria: ScanCriteria,
    exclusions: ExclusionConfig,
    probe: P,
    reader: M,
}

impl Scanner<NativeHiddenProbe> {
    #[must_use]
    pub const fn new(criteria: ScanCriteria, exclusions: ExclusionConfig) -> Self {
        Self::with_probe(criteria, exclusions, NativeHiddenProbe)
    }
}

impl<P: HiddenProbe> Scanner<P> {
    #[must_use]
    pub const fn with_probe(criteria: ScanCriteria, exclusions: ExclusionConfig, probe: P) -> Self {
        Self {
            criteria,
            exclusions,
            probe,
            reader: FsMetadata,
        }
    }
}

impl<P: HiddenProbe, M: MetadataReader> Scanner<P, M> {
    /// Replace the metadata source used for file sizes and timestamps.
    #[must_use]
    pub fn with_metadata_reader<R: MetadataReader>(self, reader: R) -> Scanner<P, R> {
        Scanner {
            criteria: self.criteria,
            exclusions: self.exclusions,
            probe: self.probe,
            reader,
        }
    }

    #[must_use]
    pub const fn criteria(&self) -> &ScanCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn exclusions(&self) -> &ExclusionConfig {
        &self.exclusions
    }

    /// Run the scan to completion or until `cancel` is set.
    ///
    /// # Errors
    /// Returns `SourceRootUnavailable` when the source root is missing or
    /// unreadable at start, or disappears while the tree is walked.
    pub fn scan(&self, cancel: &CancelToken, sink: &dyn EventSink) -> Result<ScanOutcome> {
        let started = Instant::now();
        let root = self.criteria.source_root();
        ensure_directory(root)?;

        tracing::info!(
            root = %path_utils::display(root).display(),
            field = %self.criteria.time_field(),
            start = %self.criteria.window_start(),
            end = %self.criteria.window_end(),
            "Scan started"
        );

        let mut stats = ScanStats::default();
        let mut files = Vec::new();
        let mut walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(next) = walker.next() {
            if cancel.is_cancelled() {
                tracing::info!(processed = stats.processed, "Scan cancelled");
                return Ok(ScanOutcome::Cancelled);
            }

            let entry = match next {
                Ok(entry) => entry,
                Err(err) => {
                    self.handle_walk_error(err, &mut stats, sink)?;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                if !self.should_descend(&entry, &mut stats) {
                    walker.skip_current_dir();
                }
            } else if (file_type.is_file()
                || (file_type.is_symlink() && !self.is_directory_link(entry.path())))
                && let Some(candidate) = self.visit_file(&entry, &mut stats, sink)
            {
                files.push(candidate);
            }
        }

        let result = ScanResult {
            files,
            stats,
            duration: started.elapsed(),
            criteria: self.criteria.clone(),
        };
        tracing::info!(
            found = result.files.len(),
            processed = stats.processed,
            errors = stats.errors,
            skipped = stats.total_skipped(),
            elapsed_ms = result.duration.as_millis(),
            "Scan finished"
        );
        Ok(ScanOutcome::Completed(result))
    }

    /// Decide whether the walk enters `entry`, updating counters for pruned
    /// branches.
    fn should_descend(&self, entry: &DirEntry, stats: &mut ScanStats) -> bool {
        let path = entry.path();
        if entry.depth() > 0 {
            if self.exclusions.is_dir_name_excluded(entry.file_name()) {
                tracing::debug!(path = %path.display(), "Pruned by directory pattern");
                return false;
            }
            if self.exclusions.skip_hidden() && self.probe.is_hidden(path) {
                stats.skipped_hidden += 1;
                tracing::debug!(path = %path.display(), "Pruned hidden directory");
                return false;
            }
        }
        if let Some(prefix) = self
            .exclusions
            .excluded_prefix_for(&path_utils::display(path))
        {
            stats.skipped_by_excluded_path += 1;
            tracing::debug!(path = %path.display(), prefix, "Pruned by excluded path");
            return false;
        }
        true
    }

    fn is_directory_link(&self, path: &Path) -> bool {
        self.reader.metadata(path).is_ok_and(|meta| meta.is_dir())
    }

    fn visit_file(
        &self,
        entry: &DirEntry,
        stats: &mut ScanStats,
        sink: &dyn EventSink,
    ) -> Option<CandidateFile> {
        let path = entry.path();

        if self.exclusions.is_file_name_excluded(entry.file_name()) {
            stats.skipped_pattern += 1;
            return None;
        }
        if self.exclusions.skip_hidden() && self.probe.is_hidden(path) {
            stats.skipped_hidden += 1;
            return None;
        }

        let metadata = self.reader.metadata(path);

        // A size that cannot be read does not exclude the file.
        if let Ok(meta) = &metadata
            && self.exclusions.is_below_min_size(meta.len())
        {
            stats.skipped_size += 1;
            return None;
        }

        let field = self.criteria.time_field();
        let timestamp = match metadata.and_then(|meta| field.read(&meta)) {
            Ok(timestamp) => timestamp,
            Err(err) => {
                record_entry_error(stats, sink, path, &err.to_string());
                return None;
            }
        };

        stats.processed += 1;
        if stats.processed % PROGRESS_INTERVAL == 0 {
            tracing::debug!(processed = stats.processed, "Scan progress");
            sink.emit(JobEvent::ScanProgress {
                processed: stats.processed,
            });
        }

        self.criteria
            .contains(timestamp)
            .then(|| CandidateFile {
                path: path_utils::display(path),
                timestamp,
            })
    }

    fn handle_walk_error(
        &self,
        err: walkdir::Error,
        stats: &mut ScanStats,
        sink: &dyn EventSink,
    ) -> Result<()> {
        let root = self.criteria.source_root();
        if err.depth() == 0 || !root.is_dir() {
            let message = err.to_string();
            let source = err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other(message));
            return Err(ArchiverError::SourceRootUnavailable {
                path: path_utils::display(root),
                source,
            });
        }
        let path = err.path().unwrap_or(root).to_path_buf();
        let message = err
            .io_error()
            .map_or_else(|| err.to_string(), ToString::to_string);
        record_entry_error(stats, sink, &path, &message);
        Ok(())
    }
}

fn ensure_directory(root: &Path) -> Result<()> {
    let unavailable = |source| ArchiverError::SourceRootUnavailable {
        path: path_utils::display(root),
        source,
    };
    let metadata = fs::metadata(root).map_err(unavailable)?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(unavailable(io::Error::new(
            io::ErrorKind::NotADirectory,
            "not a directory",
        )))
    }
}

fn record_entry_error(stats: &mut ScanStats, sink: &dyn EventSink, path: &Path, message: &str) {
    stats.errors += 1;
    if stats.errors > MAX_REPORTED_ERRORS {
        tracing::debug!(path = %path.display(), error = message, "Entry error");
        return;
    }
    let path = truncate_chars(
        &path_utils::display(path).to_string_lossy(),
        ERROR_PATH_CHARS,
    );
    let message = truncate_chars(message, ERROR_MESSAGE_CHARS);
    tracing::warn!(path = %path, error = %message, "Cannot read entry");
    sink.emit(JobEvent::EntryError { path, message });
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
