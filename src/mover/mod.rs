mod fs_ops;

pub use fs_ops::{FileOps, RealFileOps};

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{ArchiverError, Result};
use crate::job::{CancelToken, EventSink, JobEvent};
use crate::path_utils::{self, truncate_chars};
use crate::scanner::{CandidateFile, ScanResult};

/// A progress event is emitted every this many files.
pub const PROGRESS_INTERVAL: usize = 10;

/// Prefix of the failure reason when the archived copy differs in size.
pub const INTEGRITY_MISMATCH: &str = "integrity mismatch";

const MAX_REASON_CHARS: usize = 100;

/// Files to move and where they go.
#[derive(Debug, Clone)]
pub struct MovePlan {
    pub source_root: PathBuf,
    pub archive_root: PathBuf,
    pub files: Vec<CandidateFile>,
}

impl MovePlan {
    /// Plan moving every file of `scan` below `archive_root`.
    ///
    /// # Errors
    /// Returns `ArchiveRootUnavailable` when `archive_root` cannot be resolved.
    pub fn from_scan(scan: ScanResult, archive_root: &Path) -> Result<Self> {
        let archive_root = path_utils::normalize(archive_root).map_err(|_| {
            ArchiverError::ArchiveRootUnavailable {
                path: archive_root.to_path_buf(),
            }
        })?;
        Ok(Self {
            source_root: path_utils::display(scan.criteria.source_root()),
            archive_root: path_utils::display(&archive_root),
            files: scan.files,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Success { source: PathBuf, destination: PathBuf },
    Failure { source: PathBuf, reason: String },
}

impl MoveOutcome {
    #[must_use]
    pub fn source(&self) -> &Path {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTermination {
    Completed,
    Cancelled,
    /// The archive root became unusable; remaining files were not attempted.
    Fatal(String),
}

impl MoveTermination {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Fatal(_) => "fatal",
        }
    }
}

/// Outcome of a move job. Outcomes follow the plan order; files after a
/// cancellation or fatal stop are absent.
#[derive(Debug, Clone)]
pub struct MoveResult {
    pub outcomes: Vec<MoveOutcome>,
    pub success_count: usize,
    pub error_count: usize,
    pub duration: Duration,
    pub source_root: PathBuf,
    pub archive_root: PathBuf,
    pub termination: MoveTermination,
}

impl MoveResult {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error_count == 0 && self.termination == MoveTermination::Completed
    }
}

/// Relocates files with copy, size verification, then source deletion.
///
/// Each file is independent: a failure is recorded and the next file is
/// attempted. The source is only deleted once the archived copy has the same
/// size.
pub struct Mover<F: FileOps = RealFileOps> {
    ops: F,
}

impl Default for Mover<RealFileOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl Mover<RealFileOps> {
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: RealFileOps }
    }
}

impl<F: FileOps> Mover<F> {
    #[must_use]
    pub const fn with_ops(ops: F) -> Self {
        Self { ops }
    }

    /// Move every file of `plan`, polling `cancel` between files.
    pub fn run(&self, plan: &MovePlan, cancel: &CancelToken, sink: &dyn EventSink) -> MoveResult {
        let started = Instant::now();
        let total = plan.files.len();
        let mut outcomes = Vec::with_capacity(total);
        let mut success_count = 0;
        let mut error_count = 0;
        let mut termination = MoveTermination::Completed;

        tracing::info!(
            files = total,
            archive = %plan.archive_root.display(),
            "Move started"
        );

        for (index, file) in plan.files.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(moved = index, total, "Move cancelled");
                termination = MoveTermination::Cancelled;
                break;
            }
            let position = index + 1;
            let source = path_utils::display(&file.path);

            match self.move_one(plan, &source) {
                Ok(destination) => {
                    tracing::debug!(
                        source = %source.display(),
                        destination = %destination.display(),
                        "Moved"
                    );
                    sink.emit(JobEvent::FileMoved {
                        index: position,
                        total,
                        source: source.clone(),
                    });
                    success_count += 1;
                    outcomes.push(MoveOutcome::Success {
                        source,
                        destination,
                    });
                }
                Err(reason) => {
                    let reason = truncate_chars(&reason, MAX_REASON_CHARS);
                    tracing::warn!(source = %source.display(), reason = %reason, "Move failed");
                    sink.emit(JobEvent::MoveFailed {
                        source: source.clone(),
                        reason: reason.clone(),
                    });
                    error_count += 1;
                    outcomes.push(MoveOutcome::Failure { source, reason });

                    if !self.ops.is_dir(&plan.archive_root) {
                        let reason = format!(
                            "archive folder is no longer available: {}",
                            plan.archive_root.display()
                        );
                        tracing::error!("{reason}");
                        termination = MoveTermination::Fatal(reason);
                        break;
                    }
                }
            }

            if position % PROGRESS_INTERVAL == 0 {
                sink.emit(JobEvent::MoveProgress {
                    index: position,
                    total,
                });
            }
        }

        let result = MoveResult {
            outcomes,
            success_count,
            error_count,
            duration: started.elapsed(),
            source_root: plan.source_root.clone(),
            archive_root: plan.archive_root.clone(),
            termination,
        };
        tracing::info!(
            succeeded = result.success_count,
            failed = result.error_count,
            termination = result.termination.as_str(),
            "Move finished"
        );
        result
    }

    /// Returns the destination in display form, or the failure reason.
    fn move_one(&self, plan: &MovePlan, source: &Path) -> std::result::Result<PathBuf, String> {
        let relative = path_utils::relative_to(source, &plan.source_root).ok_or_else(|| {
            format!(
                "not inside source folder {}",
                plan.source_root.display()
            )
        })?;
        let destination = plan.archive_root.join(relative);

        let source_io = path_utils::normalize(source).map_err(|err| describe("resolve source", &err))?;
        let destination_io =
            path_utils::normalize(&destination).map_err(|err| describe("resolve destination", &err))?;

        if let Some(parent) = destination_io.parent() {
            self.ops
                .create_dir_all(parent)
                .map_err(|err| describe("create folder", &err))?;
        }
        self.ops
            .copy(&source_io, &destination_io)
            .map_err(|err| describe("copy", &err))?;

        let source_len = self
            .ops
            .len(&source_io)
            .map_err(|err| describe("read source size", &err))?;
        let copy_len = self
            .ops
            .len(&destination_io)
            .map_err(|err| describe("read copy size", &err))?;
        if source_len != copy_len {
            if let Err(err) = self.ops.remove_file(&destination_io) {
                tracing::warn!(
                    path = %destination.display(),
                    error = %err,
                    "Could not remove mismatched copy"
                );
            }
            return Err(format!(
                "{INTEGRITY_MISMATCH}: source {source_len} bytes, copy {copy_len} bytes"
            ));
        }

        self.ops
            .remove_file(&source_io)
            .map_err(|err| describe("delete source", &err))?;
        Ok(destination)
    }
}

fn describe(step: &str, err: &io::Error) -> String {
    format!("{step} failed: {err}")
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
