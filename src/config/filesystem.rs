//! Where the config loader looks for files.
//!
//! Discovery only needs three facts from the outside world: the working
//! directory, the per-user config directory, and whether a candidate settings
//! file is there to read. Tests swap in an in-memory implementation.

use std::io;
use std::path::{Path, PathBuf};

pub trait FileSystem {
    /// Contents of a settings file.
    ///
    /// # Errors
    /// Returns the I/O error if the file cannot be read.
    fn read_config(&self, path: &Path) -> io::Result<String>;

    /// Whether `path` is a regular file. A directory that happens to carry a
    /// settings file name is not a candidate.
    fn is_file(&self, path: &Path) -> bool;

    /// Directory searched for `.stale-archiver.toml`.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined.
    fn working_dir(&self) -> io::Result<PathBuf>;

    /// Per-user directory holding `config.toml`: `%APPDATA%\stale-archiver` on
    /// Windows, `~/Library/Application Support/stale-archiver` on macOS and
    /// `$XDG_CONFIG_HOME/stale-archiver` elsewhere.
    fn user_config_dir(&self) -> Option<PathBuf>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_config(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn working_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn user_config_dir(&self) -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "stale-archiver")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }
}
