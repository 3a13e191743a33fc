use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;

/// Cooperative cancellation flag shared between a job and whoever started it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Scan,
    Move,
}

/// How a job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    Cancelled,
    Fatal,
}

/// Worker-to-caller notifications, delivered in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Started { kind: JobKind },
    /// Files whose timestamp was read so far.
    ScanProgress { processed: u64 },
    /// A file or directory could not be read during a scan.
    EntryError { path: String, message: String },
    /// Files handled so far out of `total`.
    MoveProgress { index: usize, total: usize },
    FileMoved {
        index: usize,
        total: usize,
        source: PathBuf,
    },
    MoveFailed { source: PathBuf, reason: String },
    Finished { kind: JobKind, status: JobStatus },
}

/// Destination for job events. Emitting never blocks the worker.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: JobEvent);
}

impl EventSink for Sender<JobEvent> {
    fn emit(&self, event: JobEvent) {
        // Receiver dropped: nobody is listening any more.
        let _ = self.send(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: JobEvent) {}
}
