//! Configuration semantic validation.
//!
//! Catches values that parse but would fail once a job starts: bad globs and
//! folder combinations that would make the archive part of its own source.

use std::path::Path;

use crate::config::ArchiveConfig;
use crate::path_utils::{self, CasePolicy};
use crate::scanner::split_list;
use crate::{ArchiverError, Result};

/// Validates semantic correctness of a configuration.
///
/// # Errors
/// Returns an error if a glob pattern is invalid, or the archive folder is the
/// source folder or lies inside it.
pub fn validate_config_semantics(config: &ArchiveConfig) -> Result<()> {
    validate_glob_list(&config.exclude_files)?;
    validate_glob_list(&config.exclude_dirs)?;
    if let (Some(source), Some(archive)) = (&config.source_folder, &config.archive_folder) {
        validate_folders(source, archive)?;
    }
    Ok(())
}

fn validate_glob_list(raw: &str) -> Result<()> {
    for pattern in split_list(raw) {
        globset::Glob::new(&pattern)
            .map_err(|source| ArchiverError::InvalidPattern { pattern, source })?;
    }
    Ok(())
}

/// Archiving into a folder below the source would re-scan archived files on the
/// next run.
fn validate_folders(source: &Path, archive: &Path) -> Result<()> {
    let (Ok(source_abs), Ok(archive_abs)) =
        (path_utils::normalize(source), path_utils::normalize(archive))
    else {
        return Ok(());
    };
    let case = CasePolicy::native();
    let source_key = path_utils::comparison_key(&source_abs, case);
    let archive_key = path_utils::comparison_key(&archive_abs, case);
    if archive_key.starts_with(&source_key) {
        return Err(ArchiverError::Config(format!(
            "archive_folder ({}) must not be inside source_folder ({})",
            archive.display(),
            source.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config_semantics(&ArchiveConfig::default()).is_ok());
    }

    #[test]
    fn invalid_file_glob_is_rejected() {
        let config = ArchiveConfig {
            exclude_files: "*.tmp, [oops".to_string(),
            ..ArchiveConfig::default()
        };
        let err = validate_config_semantics(&config).unwrap_err();
        assert!(matches!(err, ArchiverError::InvalidPattern { ref pattern, .. } if pattern == "[oops"));
    }

    #[test]
    fn archive_inside_source_is_rejected() {
        let config = ArchiveConfig {
            source_folder: Some(PathBuf::from("/data")),
            archive_folder: Some(PathBuf::from("/data/archive")),
            ..ArchiveConfig::default()
        };
        assert!(matches!(
            validate_config_semantics(&config),
            Err(ArchiverError::Config(_))
        ));
    }

    #[test]
    fn sibling_archive_with_shared_prefix_is_allowed() {
        let config = ArchiveConfig {
            source_folder: Some(PathBuf::from("/data")),
            archive_folder: Some(PathBuf::from("/data-archive")),
            ..ArchiveConfig::default()
        };
        assert!(validate_config_semantics(&config).is_ok());
    }
}
