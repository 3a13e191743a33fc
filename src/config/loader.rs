use std::path::{Path, PathBuf};

use crate::error::{ArchiverError, Result};

use super::ArchiveConfig;
use super::filesystem::{FileSystem, RealFileSystem};

/// A loaded configuration together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub config: ArchiveConfig,
    /// `None` when no file was found and defaults were used.
    pub source: Option<PathBuf>,
}

impl LoadResult {
    fn defaults() -> Self {
        Self {
            config: ArchiveConfig::default(),
            source: None,
        }
    }
}

/// Trait for loading configuration from various sources.
pub trait ConfigLoader {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    /// Returns an error if a discovered config file cannot be read or parsed.
    fn load(&self) -> Result<LoadResult>;

    /// Load configuration from a specific path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    fn load_from_path(&self, path: &Path) -> Result<LoadResult>;
}

pub const LOCAL_CONFIG_NAME: &str = ".stale-archiver.toml";
const USER_CONFIG_NAME: &str = "config.toml";

/// Loads configuration from the filesystem.
///
/// Search order:
/// 1. `.stale-archiver.toml` in current directory
/// 2. Platform-specific user config directory:
///    - Windows: `%APPDATA%\stale-archiver\config.toml`
///    - macOS: `~/Library/Application Support/stale-archiver/config.toml`
///    - Linux: `~/.config/stale-archiver/config.toml` (XDG)
/// 3. Returns `ArchiveConfig::default()` if no config found
///
/// Files ending in `.json` are read as JSON settings; everything else is TOML.
#[derive(Debug)]
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub const fn new() -> Self {
        Self { fs: RealFileSystem }
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub const fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    fn local_config_path(&self) -> Option<PathBuf> {
        self.fs
            .working_dir()
            .ok()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
    }

    fn user_config_path(&self) -> Option<PathBuf> {
        self.fs.user_config_dir().map(|dir| dir.join(USER_CONFIG_NAME))
    }

    fn parse_config(path: &Path, content: &str) -> Result<ArchiveConfig> {
        if is_json(path) {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl<F: FileSystem> ConfigLoader for FileConfigLoader<F> {
    fn load(&self) -> Result<LoadResult> {
        if let Some(local_path) = self.local_config_path()
            && self.fs.is_file(&local_path)
        {
            return self.load_from_path(&local_path);
        }

        if let Some(user_path) = self.user_config_path()
            && self.fs.is_file(&user_path)
        {
            return self.load_from_path(&user_path);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(LoadResult::defaults())
    }

    fn load_from_path(&self, path: &Path) -> Result<LoadResult> {
        let content =
            self.fs
                .read_config(path)
                .map_err(|source| ArchiverError::FileAccess {
                    path: path.to_path_buf(),
                    source,
                })?;
        let config = Self::parse_config(path, &content).map_err(|err| match err {
            ArchiverError::TomlParse(inner) => {
                ArchiverError::Config(format!("{}: {}", path.display(), inner.message()))
            }
            ArchiverError::Json(inner) => {
                ArchiverError::Config(format!("{}: {inner}", path.display()))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(LoadResult {
            config,
            source: Some(path.to_path_buf()),
        })
    }
}

#[cfg(test)]
#[path = "loader_tests/mod.rs"]
mod tests;
