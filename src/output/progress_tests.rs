use std::path::PathBuf;

use super::*;
use crate::job::JobStatus;

fn hidden() -> JobProgress {
    JobProgress::new_with_visibility(true, false)
}

#[test]
fn scan_events_move_the_counter() {
    let progress = hidden();
    progress.handle(&JobEvent::Started {
        kind: JobKind::Scan,
    });
    progress.handle(&JobEvent::ScanProgress { processed: 200 });
    progress.handle(&JobEvent::ScanProgress { processed: 400 });

    assert_eq!(progress.progress_bar.position(), 400);
}

#[test]
fn move_events_set_length_and_position() {
    let progress = hidden();
    progress.handle(&JobEvent::Started {
        kind: JobKind::Move,
    });
    progress.handle(&JobEvent::FileMoved {
        index: 3,
        total: 12,
        source: PathBuf::from("a.txt"),
    });

    assert_eq!(progress.progress_bar.length(), Some(12));
    assert_eq!(progress.progress_bar.position(), 3);

    progress.handle(&JobEvent::MoveProgress {
        index: 10,
        total: 12,
    });
    assert_eq!(progress.progress_bar.position(), 10);
}

#[test]
fn failures_show_in_message() {
    let progress = hidden();
    progress.handle(&JobEvent::MoveFailed {
        source: PathBuf::from("locked.docx"),
        reason: "copy failed".to_string(),
    });

    assert!(progress.progress_bar.message().contains("locked.docx"));
}

#[test]
fn finished_event_clears_the_display() {
    let progress = hidden();
    progress.handle(&JobEvent::Finished {
        kind: JobKind::Scan,
        status: JobStatus::Completed,
    });

    assert!(progress.progress_bar.is_finished());
}

#[test]
fn visible_progress_accepts_both_templates() {
    let progress = JobProgress::new_with_visibility(false, true);
    progress.handle(&JobEvent::Started {
        kind: JobKind::Move,
    });
    progress.finish();
}
