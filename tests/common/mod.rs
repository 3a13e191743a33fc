#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};
use filetime::FileTime;
use tempfile::TempDir;

/// Creates an `assert_cmd` Command for the stale-archiver binary.
#[macro_export]
macro_rules! stale_archiver {
    () => {
        assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("stale-archiver"))
    };
}

/// A temporary tree with a `src/` folder to scan and an `archive/` folder.
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        fixture.create_dir("src");
        fixture.create_dir("archive");
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn archive(&self) -> PathBuf {
        self.dir.path().join("archive")
    }

    /// Directory used as the user config dir so a real one never leaks in.
    pub fn xdg_config(&self) -> PathBuf {
        self.dir.path().join("xdg")
    }

    pub fn create_dir(&self, relative_path: &str) {
        fs::create_dir_all(self.dir.path().join(relative_path))
            .expect("Failed to create directory");
    }

    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Creates a file of `size` bytes whose mtime is noon on `date` (YYYY-MM-DD).
    pub fn create_dated_file(&self, relative_path: &str, size: usize, date: &str) -> PathBuf {
        let path = self.create_file(relative_path, &"x".repeat(size));
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date");
        let noon = Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).expect("valid time"))
            .earliest()
            .expect("representable local time");
        let time = FileTime::from_unix_time(noon.timestamp(), 0);
        filetime::set_file_times(&path, time, time).expect("Failed to set file times");
        path
    }

    pub fn read(&self, relative_path: &str) -> String {
        fs::read_to_string(self.dir.path().join(relative_path)).expect("Failed to read file")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Config matching the tree built by [`build_sample_tree`].
pub const SAMPLE_CONFIG: &str = r#"
time_type = "modified"
skip_hidden = true
exclude_files = "*.tmp"
exclude_dirs = "node_modules"
exclude_paths = "keep"
exclude_small = true
min_size_kb = 1
save_txt_report = true
"#;

/// Files inside and outside the 2023 window, plus one file per exclusion rule.
pub fn build_sample_tree(fixture: &TestFixture) {
    fixture.create_dated_file("src/report.docx", 4096, "2023-06-01");
    fixture.create_dated_file("src/sub/deep/notes.txt", 2048, "2023-11-20");
    fixture.create_dated_file("src/old.bin", 50 * 1024, "2022-01-01");
    fixture.create_dated_file("src/small.txt", 10, "2023-06-01");
    fixture.create_dated_file("src/scratch.tmp", 4096, "2023-06-01");
    fixture.create_dated_file("src/node_modules/pkg/index.js", 4096, "2023-06-01");
    fixture.create_dated_file("src/keep/contract.pdf", 4096, "2023-06-01");
    fixture.create_dated_file("src/.cache/blob.dat", 4096, "2023-06-01");
}
