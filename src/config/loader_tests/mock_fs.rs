use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::FileSystem;

/// In-memory settings files plus a log of which ones the loader read.
pub struct MockFileSystem {
    files: HashMap<PathBuf, String>,
    dirs: HashSet<PathBuf>,
    reads: Arc<Mutex<Vec<PathBuf>>>,
    working_dir: PathBuf,
    user_config_dir: Option<PathBuf>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            dirs: HashSet::new(),
            reads: Arc::default(),
            working_dir: PathBuf::from("/project"),
            user_config_dir: Some(PathBuf::from("/home/user/.config/stale-archiver")),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }

    /// A directory occupying a settings file name.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    pub fn with_current_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = path.into();
        self
    }

    pub fn with_config_dir(mut self, path: Option<PathBuf>) -> Self {
        self.user_config_dir = path;
        self
    }

    /// Shared log of read paths; it stays usable after the mock moves into
    /// a loader.
    pub fn read_log(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        Arc::clone(&self.reads)
    }
}

impl FileSystem for MockFileSystem {
    fn read_config(&self, path: &Path) -> std::io::Result<String> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        if self.dirs.contains(path) {
            return Err(Error::new(ErrorKind::IsADirectory, "is a directory"));
        }
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, "file not found"))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn working_dir(&self) -> std::io::Result<PathBuf> {
        Ok(self.working_dir.clone())
    }

    fn user_config_dir(&self) -> Option<PathBuf> {
        self.user_config_dir.clone()
    }
}
