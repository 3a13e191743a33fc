//! End-to-end tests for the `archive` command: scan, then move.

mod common;

use common::{SAMPLE_CONFIG, TestFixture, build_sample_tree};
use predicates::prelude::*;
use stale_archiver::output::{MoveReport, MoveStatus};

fn archive_2023(fixture: &TestFixture) -> assert_cmd::Command {
    fixture.create_file(".stale-archiver.toml", SAMPLE_CONFIG);
    let mut cmd = stale_archiver!();
    cmd.current_dir(fixture.path())
        .env("XDG_CONFIG_HOME", fixture.xdg_config())
        .env("NO_COLOR", "1")
        .args([
            "archive",
            "src",
            "--archive",
            "archive",
            "--from",
            "2023-01-01",
            "--to",
            "2023-12-31",
        ]);
    cmd
}

#[test]
fn dry_run_lists_files_without_moving() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    archive_2023(&fixture)
        .arg("--no-report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("report.docx"))
        .stdout(predicate::str::contains("--yes"));

    assert!(fixture.source().join("report.docx").exists());
    assert!(!fixture.archive().join("report.docx").exists());
}

#[test]
fn confirmed_archive_moves_matches_and_preserves_structure() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    archive_2023(&fixture)
        .args(["--yes", "--report", "move.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 failed"));

    let archive = fixture.archive();
    assert!(archive.join("report.docx").exists());
    assert!(archive.join("sub").join("deep").join("notes.txt").exists());
    assert!(!fixture.source().join("report.docx").exists());
    assert!(!fixture.source().join("sub").join("deep").join("notes.txt").exists());

    // Everything excluded stays where it was.
    for kept in [
        "old.bin",
        "small.txt",
        "scratch.tmp",
        "node_modules/pkg/index.js",
        "keep/contract.pdf",
    ] {
        assert!(fixture.source().join(kept).exists(), "{kept} was moved");
    }
    assert!(!archive.join("old.bin").exists());
}

#[test]
fn archived_copies_keep_content_and_mtime() {
    let fixture = TestFixture::new();
    let original = fixture.create_dated_file("src/a/b/data.csv", 5000, "2023-03-03");
    let mtime = std::fs::metadata(&original).unwrap().modified().unwrap();

    archive_2023(&fixture)
        .args(["--yes", "--no-report"])
        .assert()
        .success();

    let moved = fixture.archive().join("a").join("b").join("data.csv");
    assert_eq!(std::fs::metadata(&moved).unwrap().len(), 5000);
    assert_eq!(std::fs::metadata(&moved).unwrap().modified().unwrap(), mtime);
}

#[test]
fn move_report_lists_every_file() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    archive_2023(&fixture)
        .args(["--yes", "--report", "reports/move.json"])
        .assert()
        .success();

    let report: MoveReport = serde_json::from_str(&fixture.read("reports/move.json")).unwrap();
    assert_eq!(report.metadata.total_files, report.files.len());
    assert_eq!(report.metadata.error_count, 0);
    assert_eq!(report.metadata.success_count, report.files.len());
    assert!(report
        .files
        .iter()
        .all(|f| f.status == MoveStatus::Success && f.archive_path.is_some()));

    let text = fixture.read("reports/move.txt");
    assert!(text.contains("ARCHIVE MOVE REPORT"));
    assert!(text.contains("Status: SUCCESS"));
}

#[test]
fn second_run_finds_nothing_left() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    archive_2023(&fixture)
        .args(["--yes", "--no-report"])
        .assert()
        .success();

    let mut again = stale_archiver!();
    again
        .current_dir(fixture.path())
        .env("XDG_CONFIG_HOME", fixture.xdg_config())
        .args([
            "archive", "src", "--archive", "archive", "--from", "2023-01-01", "--to", "2023-12-31",
            "--yes", "--no-report",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to archive"));
}

#[test]
fn missing_archive_folder_fails_before_touching_files() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);
    std::fs::remove_dir(fixture.archive()).unwrap();

    archive_2023(&fixture)
        .args(["--yes", "--no-report"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Archive folder is not accessible"));

    assert!(fixture.source().join("report.docx").exists());
}

#[test]
fn archive_inside_source_is_refused() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    stale_archiver!()
        .current_dir(fixture.path())
        .args(["--no-config", "archive", "src", "--archive", "src/sub", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must not be inside"));
}
