use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexSet;

use crate::error::{ArchiverError, Result};
use crate::path_utils::{self, CasePolicy};

/// Directory names that are never scanned, whatever the configuration says.
pub const SYSTEM_DIRS: [&str; 3] = ["$RECYCLE.BIN", "System Volume Information", "Recovery"];

/// Raw, user-facing exclusion settings before compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExclusionRules<'a> {
    pub skip_hidden: bool,
    /// Comma-separated file name globs.
    pub exclude_files: &'a str,
    /// Comma-separated directory name globs.
    pub exclude_dirs: &'a str,
    /// Comma-separated directory paths, absolute or relative to the source root.
    pub exclude_paths: &'a str,
    /// Minimum file size in KiB; `None` disables the size filter.
    pub min_size_kb: Option<u64>,
}

/// Compiled exclusion rules for one scan job.
///
/// Patterns and path prefixes are normalized once here and never re-derived
/// while scanning.
#[derive(Debug, Clone)]
pub struct ExclusionConfig {
    skip_hidden: bool,
    file_patterns: Vec<String>,
    dir_patterns: Vec<String>,
    file_matcher: GlobSet,
    dir_matcher: GlobSet,
    excluded_paths: Vec<PathBuf>,
    excluded_prefixes: IndexSet<String>,
    min_size_bytes: Option<u64>,
    case: CasePolicy,
}

impl ExclusionConfig {
    /// Compile `rules` for a scan rooted at `source_root`.
    ///
    /// # Errors
    /// Returns `InvalidPattern` if any glob fails to compile.
    pub fn compile(rules: &ExclusionRules<'_>, source_root: &Path, case: CasePolicy) -> Result<Self> {
        let file_patterns = split_list(rules.exclude_files);
        let mut dir_patterns = split_list(rules.exclude_dirs);
        dir_patterns.extend(SYSTEM_DIRS.iter().map(ToString::to_string));

        let file_matcher = build_glob_set(&file_patterns, case)?;
        let dir_matcher = build_glob_set(&dir_patterns, case)?;

        let mut excluded_paths = Vec::new();
        let mut excluded_prefixes = IndexSet::new();
        for entry in split_list(rules.exclude_paths) {
            let raw = Path::new(&entry);
            let joined = if raw.is_absolute() {
                raw.to_path_buf()
            } else {
                source_root.join(raw)
            };
            match path_utils::normalize(&joined) {
                Ok(normalized) => {
                    excluded_prefixes.insert(path_utils::comparison_key(&normalized, case));
                    excluded_paths.push(path_utils::display(&normalized));
                }
                Err(err) => {
                    tracing::warn!(path = %entry, error = %err, "Ignoring unresolvable excluded path");
                }
            }
        }

        let min_size_bytes = rules
            .min_size_kb
            .filter(|kb| *kb > 0)
            .map(|kb| kb.saturating_mul(1024));

        Ok(Self {
            skip_hidden: rules.skip_hidden,
            file_patterns,
            dir_patterns,
            file_matcher,
            dir_matcher,
            excluded_paths,
            excluded_prefixes,
            min_size_bytes,
            case,
        })
    }

    #[must_use]
    pub const fn skip_hidden(&self) -> bool {
        self.skip_hidden
    }

    #[must_use]
    pub fn file_patterns(&self) -> &[String] {
        &self.file_patterns
    }

    /// Directory patterns, system directories included.
    #[must_use]
    pub fn dir_patterns(&self) -> &[String] {
        &self.dir_patterns
    }

    #[must_use]
    pub fn excluded_paths(&self) -> &[PathBuf] {
        &self.excluded_paths
    }

    #[must_use]
    pub const fn min_size_bytes(&self) -> Option<u64> {
        self.min_size_bytes
    }

    #[must_use]
    pub const fn case_policy(&self) -> CasePolicy {
        self.case
    }

    #[must_use]
    pub fn is_file_name_excluded(&self, name: &OsStr) -> bool {
        self.file_matcher.is_match(Path::new(name))
    }

    #[must_use]
    pub fn is_dir_name_excluded(&self, name: &OsStr) -> bool {
        self.dir_matcher.is_match(Path::new(name))
    }

    /// The excluded prefix covering `dir`, if any.
    #[must_use]
    pub fn excluded_prefix_for(&self, dir: &Path) -> Option<&str> {
        if self.excluded_prefixes.is_empty() {
            return None;
        }
        let key = path_utils::comparison_key(dir, self.case);
        self.excluded_prefixes
            .iter()
            .find(|prefix| key.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_below_min_size(&self, len: u64) -> bool {
        self.min_size_bytes.is_some_and(|min| len < min)
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
/// Order and duplicates are preserved.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn build_glob_set(patterns: &[String], case: CasePolicy) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(case.is_insensitive())
            .build()
            .map_err(|source| ArchiverError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ArchiverError::InvalidPattern {
        pattern: "combined patterns".to_string(),
        source,
    })
}

#[cfg(test)]
#[path = "exclusion_tests.rs"]
mod tests;
