use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Reads the metadata the scanner filters on (size and timestamps).
///
/// Links are followed, so a symlink to a file reports its target's size and
/// times and a dangling link fails.
pub trait MetadataReader: Send + Sync {
    /// # Errors
    /// Returns the I/O error of the underlying lookup.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;
}

/// `std::fs::metadata`, which follows symlinks.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsMetadata;

impl MetadataReader for FsMetadata {
    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        fs::metadata(path)
    }
}
