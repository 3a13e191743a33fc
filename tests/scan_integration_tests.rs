//! Integration tests for the `scan` command.

mod common;

use common::{SAMPLE_CONFIG, TestFixture, build_sample_tree};
use predicates::prelude::*;
use stale_archiver::output::ScanReport;

fn scan_2023(fixture: &TestFixture) -> assert_cmd::Command {
    fixture.create_file(".stale-archiver.toml", SAMPLE_CONFIG);
    let mut cmd = stale_archiver!();
    cmd.current_dir(fixture.path())
        .env("XDG_CONFIG_HOME", fixture.xdg_config())
        .env("NO_COLOR", "1")
        .args(["scan", "src", "--from", "2023-01-01", "--to", "2023-12-31"]);
    cmd
}

fn file_names(report: &ScanReport) -> Vec<String> {
    report
        .files
        .iter()
        .map(|f| {
            std::path::Path::new(&f.path)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

#[test]
fn scan_finds_only_files_passing_every_rule() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    scan_2023(&fixture)
        .args(["--report", "out/scan.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("files found"));

    let report: ScanReport = serde_json::from_str(&fixture.read("out/scan.json")).unwrap();
    let mut names = file_names(&report);
    names.sort();
    #[cfg(unix)]
    assert_eq!(names, vec!["notes.txt", "report.docx"]);
    #[cfg(not(unix))]
    assert!(names.contains(&"notes.txt".to_string()) && names.contains(&"report.docx".to_string()));

    let stats = &report.metadata.statistics;
    assert_eq!(stats.skipped_by_path, 1);
    assert_eq!(stats.skipped_size, 1);
    assert_eq!(stats.skipped_pattern, 1);
    #[cfg(unix)]
    assert_eq!(stats.skipped_hidden, 1);
    assert_eq!(report.metadata.search_params.exclude_dirs, "node_modules");
}

#[test]
fn scan_never_reports_files_below_excluded_or_pruned_dirs() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    scan_2023(&fixture)
        .args(["--report", "scan.json"])
        .assert()
        .success();

    let json = fixture.read("scan.json");
    assert!(!json.contains("index.js"));
    assert!(!json.contains("contract.pdf"));
    assert!(!json.contains("old.bin"));
}

#[test]
fn scan_writes_text_report_next_to_json() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    scan_2023(&fixture)
        .args(["--report", "scan.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scan.txt"));

    let text = fixture.read("scan.txt");
    assert!(text.contains("FOUND FILES REPORT"));
    assert!(text.contains("Period: 01.01.2023 00:00 to 31.12.2023 23:59"));
}

#[test]
fn scan_no_txt_and_no_report() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    scan_2023(&fixture)
        .args(["--report", "scan.json", "--no-txt"])
        .assert()
        .success();
    assert!(fixture.path().join("scan.json").exists());
    assert!(!fixture.path().join("scan.txt").exists());

    let fixture = TestFixture::new();
    build_sample_tree(&fixture);
    scan_2023(&fixture).arg("--no-report").assert().success();
    let written: Vec<_> = std::fs::read_dir(fixture.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("search_report_"))
        .collect();
    assert!(written.is_empty());
}

#[test]
fn scan_default_report_name_is_timestamped() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    scan_2023(&fixture).assert().success();

    let names: Vec<String> = std::fs::read_dir(fixture.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.starts_with("search_report_"))
        .collect();
    assert_eq!(names.len(), 2, "{names:?}");
    assert!(names.iter().any(|n| n.ends_with(".json")));
    assert!(names.iter().any(|n| n.ends_with(".txt")));
}

#[test]
fn scan_leaves_files_in_place() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    scan_2023(&fixture).arg("--no-report").assert().success();

    assert!(fixture.source().join("report.docx").exists());
}

#[test]
fn scan_missing_source_is_an_error() {
    let fixture = TestFixture::new();

    stale_archiver!()
        .current_dir(fixture.path())
        .args(["--no-config", "--color", "never", "scan", "missing", "--no-report"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("✖ Path: Source folder is not accessible"));
}

#[test]
fn scan_without_source_explains_how_to_set_it() {
    let fixture = TestFixture::new();

    stale_archiver!()
        .current_dir(fixture.path())
        .args(["--no-config", "--color", "never", "scan", "--no-report"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no source folder"));
}

#[test]
fn scan_rejects_bad_dates() {
    let fixture = TestFixture::new();

    stale_archiver!()
        .current_dir(fixture.path())
        .args(["--no-config", "--color", "never", "scan", "src", "--from", "2023-13-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid date"))
        .stderr(predicate::str::contains("help:"));

    stale_archiver!()
        .current_dir(fixture.path())
        .args([
            "--no-config",
            "scan",
            "src",
            "--from",
            "2023-12-31",
            "--to",
            "2023-01-01",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid time window"));
}

#[test]
fn scan_rejects_invalid_glob_override() {
    let fixture = TestFixture::new();

    stale_archiver!()
        .current_dir(fixture.path())
        .args(["--no-config", "scan", "src", "--exclude-dirs", "[oops", "--no-report"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid glob pattern").or(predicate::str::contains("[oops")));
}

#[test]
fn quiet_scan_prints_nothing_on_stdout() {
    let fixture = TestFixture::new();
    build_sample_tree(&fixture);

    scan_2023(&fixture)
        .args(["--quiet", "--no-report"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
