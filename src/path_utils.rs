//! Path normalization shared by the scanner, the mover and the reports.
//!
//! Paths are resolved to an absolute, lexically cleaned form. On Windows,
//! paths longer than the legacy `MAX_PATH` ceiling get the `\\?\`
//! extended-length prefix for filesystem calls; [`display`] strips it again
//! before a path is shown to the user or used for relative-path computation.

use std::borrow::Cow;
use std::io;
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Longest path (in UTF-16 units) Windows accepts without the extended prefix.
pub const MAX_LEGACY_PATH_LEN: usize = 259;

/// How names and path prefixes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasePolicy {
    Sensitive,
    Insensitive,
}

impl CasePolicy {
    /// Case policy of the filesystems typically found on this platform.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            Self::Insensitive
        } else {
            Self::Sensitive
        }
    }

    #[must_use]
    pub const fn is_insensitive(self) -> bool {
        matches!(self, Self::Insensitive)
    }

    /// Fold `text` for comparison under this policy.
    #[must_use]
    pub fn fold(self, text: &str) -> Cow<'_, str> {
        match self {
            Self::Sensitive => Cow::Borrowed(text),
            Self::Insensitive => Cow::Owned(text.to_lowercase()),
        }
    }
}

impl Default for CasePolicy {
    fn default() -> Self {
        Self::native()
    }
}

/// Resolve `path` to the absolute form used for filesystem calls.
///
/// # Errors
/// Returns an error if the path is empty or the current directory cannot be
/// determined for a relative path.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let cleaned = lexical_clean(dunce::simplified(&absolute));
    Ok(extended_length(cleaned))
}

/// Strip the extended-length prefix so the path can be shown or compared.
///
/// `dunce` refuses to simplify paths past `MAX_PATH`, which are exactly the
/// ones [`normalize`] prefixes, so the prefix is removed by hand on Windows.
#[must_use]
pub fn display(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        let text = path.to_string_lossy();
        if let Some(unc) = text.strip_prefix(r"\\?\UNC\") {
            return PathBuf::from(format!(r"\\{unc}"));
        }
        if let Some(rest) = text.strip_prefix(r"\\?\") {
            return PathBuf::from(rest);
        }
    }
    dunce::simplified(path).to_path_buf()
}

/// Comparison key for prefix matching: display form, case-folded per
/// `case`, always terminated by a separator so `/a/b` cannot match `/a/bc`.
#[must_use]
pub fn comparison_key(path: &Path, case: CasePolicy) -> String {
    let shown = display(path);
    let mut key = case.fold(&shown.to_string_lossy()).into_owned();
    if !key.ends_with(MAIN_SEPARATOR) && !key.ends_with('/') {
        key.push(MAIN_SEPARATOR);
    }
    key
}

/// `path` relative to `root`, both compared in display form.
#[must_use]
pub fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    display(path)
        .strip_prefix(display(root))
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Truncate `text` to at most `max_chars` characters, marking the cut with `...`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Collapse `.` and `..` components without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root leaves the root in place.
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(windows)]
fn extended_length(path: PathBuf) -> PathBuf {
    let text = path.to_string_lossy();
    if text.encode_utf16().count() <= MAX_LEGACY_PATH_LEN || text.starts_with(r"\\?\") {
        return path;
    }
    text.strip_prefix(r"\\").map_or_else(
        || PathBuf::from(format!(r"\\?\{text}")),
        |unc| PathBuf::from(format!(r"\\?\UNC\{unc}")),
    )
}

#[cfg(not(windows))]
const fn extended_length(path: PathBuf) -> PathBuf {
    path
}
