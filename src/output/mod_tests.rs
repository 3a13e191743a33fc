use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;
use super::test_fixtures::{at, config, move_result, scan_result};

#[test]
fn default_names_embed_the_timestamp() {
    let generated = at(2024, 1, 15, 9, 5, 7);
    assert_eq!(
        ReportWriter::default_scan_name(generated),
        PathBuf::from("search_report_20240115_090507.json")
    );
    assert_eq!(
        ReportWriter::default_move_name(generated),
        PathBuf::from("archive_report_20240115_090507.json")
    );
}

#[test]
fn text_sibling_swaps_json_extension() {
    assert_eq!(
        text_sibling(Path::new("out/report.json")),
        PathBuf::from("out/report.txt")
    );
    assert_eq!(
        text_sibling(Path::new("report.JSON")),
        PathBuf::from("report.txt")
    );
}

#[test]
fn text_sibling_never_collides_with_report() {
    assert_eq!(
        text_sibling(Path::new("report.txt")),
        PathBuf::from("report.txt.txt")
    );
    assert_eq!(text_sibling(Path::new("report")), PathBuf::from("report.txt"));
}

#[test]
fn writer_creates_json_and_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reports").join("scan.json");
    let config = config();
    let context = ReportContext::now(&config);

    let written = ReportWriter::new(true)
        .write_scan(&path, &scan_result(), &context)
        .unwrap();

    assert_eq!(written.json, path);
    assert_eq!(written.text, Some(dir.path().join("reports").join("scan.txt")));
    let json: ScanReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json.metadata.total_found, 2);
    assert!(fs::read_to_string(written.text.unwrap())
        .unwrap()
        .contains("FOUND FILES REPORT"));
}

#[test]
fn writer_skips_text_when_disabled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("move.json");
    let config = config();

    let written = ReportWriter::new(false)
        .write_move(&path, &move_result(), &ReportContext::now(&config))
        .unwrap();

    assert_eq!(written.text, None);
    assert!(path.exists());
    assert!(!dir.path().join("move.txt").exists());
}

#[test]
fn unwritable_report_path_is_a_file_access_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let config = config();

    let err = ReportWriter::new(false)
        .write_scan(
            &blocker.join("scan.json"),
            &scan_result(),
            &ReportContext::now(&config),
        )
        .unwrap_err();

    assert!(matches!(err, ArchiverError::FileAccess { .. }));
}

#[test]
fn color_mode_always_and_never_ignore_the_stream() {
    assert!(ColorMode::Always.enabled_for(&std::io::stdout()));
    assert!(!ColorMode::Never.enabled_for(&std::io::stdout()));
}
