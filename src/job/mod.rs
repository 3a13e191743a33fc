//! Background job control.
//!
//! A [`Controller`] runs at most one scan or move at a time on a dedicated
//! worker thread. Callers get a [`JobHandle`] to cancel the job, drain its
//! events, and collect the result.

mod events;

pub use events::{CancelToken, EventSink, JobEvent, JobKind, JobStatus, NullSink};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use crate::error::{ArchiverError, Result};
use crate::mover::{FileOps, MovePlan, MoveResult, MoveTermination, Mover, RealFileOps};
use crate::scanner::{
    ExclusionConfig, HiddenProbe, MetadataReader, NativeHiddenProbe, ScanCriteria, ScanOutcome,
    ScanResult, Scanner,
};

/// A running job. Dropping the handle detaches the worker.
pub struct JobHandle<T> {
    kind: JobKind,
    cancel: CancelToken,
    events: Receiver<JobEvent>,
    worker: JoinHandle<Result<T>>,
}

impl<T> JobHandle<T> {
    #[must_use]
    pub const fn kind(&self) -> JobKind {
        self.kind
    }

    /// Ask the worker to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    #[must_use]
    pub fn try_next_event(&self) -> Option<JobEvent> {
        self.events.try_recv().ok()
    }

    /// Block until the next event. `None` once the worker has exited and every
    /// event was drained.
    #[must_use]
    pub fn next_event(&self) -> Option<JobEvent> {
        self.events.recv().ok()
    }

    /// Wait for the worker, discarding pending events.
    ///
    /// # Errors
    /// Returns the job's own error, or `WorkerPanicked` if the worker died.
    pub fn wait(self) -> Result<T> {
        self.wait_with(|_| {})
    }

    /// Wait for the worker, passing every event to `on_event` in order.
    ///
    /// # Errors
    /// Returns the job's own error, or `WorkerPanicked` if the worker died.
    pub fn wait_with(self, mut on_event: impl FnMut(JobEvent)) -> Result<T> {
        for event in &self.events {
            on_event(event);
        }
        self.worker.join().map_err(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            ArchiverError::WorkerPanicked(message)
        })?
    }
}

/// Clears the in-flight flag when the worker exits, panics included.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns the single-job slot and the most recent scan result.
#[derive(Debug, Default, Clone)]
pub struct Controller {
    in_flight: Arc<AtomicBool>,
    last_scan: Arc<Mutex<Option<ScanResult>>>,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Copy of the last completed scan, if it has not been consumed by a move.
    #[must_use]
    pub fn last_scan(&self) -> Option<ScanResult> {
        self.scan_slot().clone()
    }

    /// Start a scan using the platform's hidden-entry probe.
    ///
    /// # Errors
    /// Returns `JobAlreadyRunning` if another job is in flight.
    pub fn start_scan(
        &self,
        criteria: ScanCriteria,
        exclusions: ExclusionConfig,
    ) -> Result<JobHandle<ScanOutcome>> {
        self.start_scan_with(Scanner::with_probe(criteria, exclusions, NativeHiddenProbe))
    }

    /// Start a prepared scanner. A completed result replaces the stored one;
    /// a cancelled or failed scan leaves it untouched.
    ///
    /// # Errors
    /// Returns `JobAlreadyRunning` if another job is in flight.
    pub fn start_scan_with<P, M>(&self, scanner: Scanner<P, M>) -> Result<JobHandle<ScanOutcome>>
    where
        P: HiddenProbe + 'static,
        M: MetadataReader + 'static,
    {
        let guard = self.acquire()?;
        let last_scan = Arc::clone(&self.last_scan);
        spawn_job(JobKind::Scan, guard, move |cancel, sink| {
            let outcome = scanner.scan(cancel, sink);
            if let Ok(ScanOutcome::Completed(result)) = &outcome {
                *last_scan.lock().unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
            }
            let status = match &outcome {
                Ok(ScanOutcome::Completed(_)) => JobStatus::Completed,
                Ok(ScanOutcome::Cancelled) => JobStatus::Cancelled,
                Err(_) => JobStatus::Fatal,
            };
            (outcome, status)
        })
    }

    /// Move the files of the last scan into `archive_root`.
    ///
    /// # Errors
    /// See [`Controller::start_move_with`].
    pub fn start_move(&self, archive_root: &Path) -> Result<JobHandle<MoveResult>> {
        self.start_move_with(archive_root, Mover::new())
    }

    /// Move the files of the last scan with a prepared mover. The stored scan
    /// result is consumed once the job starts.
    ///
    /// # Errors
    /// Returns `JobAlreadyRunning` if another job is in flight, `NoScanResult`
    /// when there is no scan with files to move, or `ArchiveRootUnavailable`
    /// when `archive_root` is not an existing directory.
    pub fn start_move_with<F: FileOps + 'static>(
        &self,
        archive_root: &Path,
        mover: Mover<F>,
    ) -> Result<JobHandle<MoveResult>> {
        let guard = self.acquire()?;
        if self.scan_slot().as_ref().is_none_or(ScanResult::is_empty) {
            return Err(ArchiverError::NoScanResult);
        }
        if !RealFileOps.is_dir(archive_root) {
            return Err(ArchiverError::ArchiveRootUnavailable {
                path: archive_root.to_path_buf(),
            });
        }
        let scan = self.scan_slot().take().ok_or(ArchiverError::NoScanResult)?;
        let plan = MovePlan::from_scan(scan, archive_root)?;

        spawn_job(JobKind::Move, guard, move |cancel, sink| {
            let result = mover.run(&plan, cancel, sink);
            let status = match result.termination {
                MoveTermination::Completed => JobStatus::Completed,
                MoveTermination::Cancelled => JobStatus::Cancelled,
                MoveTermination::Fatal(_) => JobStatus::Fatal,
            };
            (Ok(result), status)
        })
    }

    fn acquire(&self) -> Result<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ArchiverError::JobAlreadyRunning)?;
        Ok(InFlightGuard(Arc::clone(&self.in_flight)))
    }

    fn scan_slot(&self) -> std::sync::MutexGuard<'_, Option<ScanResult>> {
        self.last_scan.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn spawn_job<T, W>(kind: JobKind, guard: InFlightGuard, work: W) -> Result<JobHandle<T>>
where
    T: Send + 'static,
    W: FnOnce(&CancelToken, &Sender<JobEvent>) -> (Result<T>, JobStatus) + Send + 'static,
{
    let cancel = CancelToken::new();
    let (tx, rx) = crossbeam_channel::unbounded();
    let worker_cancel = cancel.clone();
    let name = match kind {
        JobKind::Scan => "scan-job",
        JobKind::Move => "move-job",
    };

    let worker = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let _guard = guard;
            tx.emit(JobEvent::Started { kind });
            let (result, status) = work(&worker_cancel, &tx);
            tx.emit(JobEvent::Finished { kind, status });
            result
        })?;

    Ok(JobHandle {
        kind,
        cancel,
        events: rx,
        worker,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
