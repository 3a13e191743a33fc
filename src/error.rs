use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiverError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access file: {path}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid time window: start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("Source folder is not accessible: {path}")]
    SourceRootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive folder is not accessible: {path}")]
    ArchiveRootUnavailable { path: PathBuf },

    #[error("Another job is already running")]
    JobAlreadyRunning,

    #[error("No scan result is available to archive")]
    NoScanResult,

    #[error("Job worker stopped unexpectedly: {0}")]
    WorkerPanicked(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ArchiverError {
    /// Short category name used as the heading of rendered errors.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config(_)
            | Self::InvalidDate { .. }
            | Self::InvalidWindow { .. }
            | Self::TomlParse(_) => "Config",
            Self::FileAccess { .. } => "FileAccess",
            Self::InvalidPattern { .. } => "Pattern",
            Self::SourceRootUnavailable { .. } | Self::ArchiveRootUnavailable { .. } => "Path",
            Self::JobAlreadyRunning | Self::NoScanResult | Self::WorkerPanicked(_) => "Job",
            Self::Io(_) => "IO",
            Self::Json(_) => "JSON",
        }
    }

    /// Primary message without the nested source error.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::FileAccess { path, source } => {
                format!("{} ({})", path.display(), source.kind())
            }
            Self::InvalidPattern { pattern, source } => format!("'{pattern}': {source}"),
            _ => self.to_string(),
        }
    }

    /// Underlying cause, when there is one worth showing.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::FileAccess { source, .. } | Self::SourceRootUnavailable { source, .. } => {
                Some(source.to_string())
            }
            Self::InvalidPattern { source, .. } => Some(source.to_string()),
            Self::InvalidDate { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    /// Actionable hint for the user.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::FileAccess { source, .. } | Self::SourceRootUnavailable { source, .. } => {
                match source.kind() {
                    std::io::ErrorKind::NotFound => Some("Check that the file path exists"),
                    std::io::ErrorKind::PermissionDenied => {
                        Some("Check file permissions or run with appropriate access")
                    }
                    _ => None,
                }
            }
            Self::InvalidPattern { .. } => {
                Some("Check glob pattern syntax, e.g. '*.tmp' or 'build*'")
            }
            Self::InvalidDate { .. } => Some("Use the YYYY-MM-DD format, e.g. 2024-01-31"),
            Self::InvalidWindow { .. } => Some("The 'from' date must not be after the 'to' date"),
            Self::ArchiveRootUnavailable { .. } => {
                Some("Create the archive folder first or pass an existing directory")
            }
            Self::JobAlreadyRunning => Some("Wait for the running job to finish or cancel it"),
            Self::NoScanResult => Some("Run a scan before starting an archive job"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiverError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
