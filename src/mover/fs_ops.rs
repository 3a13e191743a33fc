use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Filesystem operations the mover performs, separated so tests can inject
/// faults such as truncated copies.
pub trait FileOps: Send + Sync {
    /// Create `path` and any missing parents. Succeeds if it already exists.
    ///
    /// # Errors
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy `from` to `to`, overwriting `to`, and carry over the access and
    /// modification times. Returns the number of bytes copied.
    ///
    /// # Errors
    /// Returns an error if reading, writing or setting times fails.
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Size of the file at `path` in bytes.
    ///
    /// # Errors
    /// Returns an error if the metadata cannot be read.
    fn len(&self, path: &Path) -> io::Result<u64>;

    /// # Errors
    /// Returns an error if the file cannot be removed.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    fn is_dir(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileOps;

impl FileOps for RealFileOps {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        let copied = fs::copy(from, to)?;
        let metadata = fs::metadata(from)?;
        filetime::set_file_times(
            to,
            FileTime::from_last_access_time(&metadata),
            FileTime::from_last_modification_time(&metadata),
        )?;
        Ok(copied)
    }

    fn len(&self, path: &Path) -> io::Result<u64> {
        fs::metadata(path).map(|meta| meta.len())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
