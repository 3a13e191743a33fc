use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::LOCAL_CONFIG_NAME;
use crate::output::ColorMode;
use crate::scanner::TimeField;

/// Color output control
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

/// Timestamp to match against the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeFieldArg {
    Modified,
    Accessed,
    Created,
}

impl From<TimeFieldArg> for TimeField {
    fn from(arg: TimeFieldArg) -> Self {
        match arg {
            TimeFieldArg::Modified => Self::Modified,
            TimeFieldArg::Accessed => Self::Accessed,
            TimeFieldArg::Created => Self::Created,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ConfigOutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "stale-archiver")]
#[command(author, version, about = "Find files by date window and move them into an archive tree")]
#[command(long_about = "Scans a folder for files whose modified, accessed or created time falls \
    inside a date window, skipping hidden files, excluded names, excluded paths and small files, \
    then moves them into an archive folder with a verified copy.\n\n\
    Exit codes:\n  \
    0 - Success\n  \
    1 - Some files failed to move, or the job was cancelled or stopped\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Increase output verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Path to configuration file (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip loading configuration file
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find files inside a date window and write a report
    Scan(ScanArgs),

    /// Scan, then move the found files into the archive folder
    Archive(ArchiveArgs),

    /// Generate a default configuration file
    Init(InitArgs),

    /// Configuration file utilities
    Config(ConfigArgs),
}

/// Date window selection. Without any flag the last 365 days are used.
#[derive(Args, Debug, Default)]
pub struct WindowArgs {
    /// First day of the window (YYYY-MM-DD); the window ends today unless `--to` is given
    #[arg(long, value_name = "DATE", conflicts_with_all = ["last_days", "this_year", "today"])]
    pub from: Option<String>,

    /// Last day of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "from")]
    pub to: Option<String>,

    /// Window covering the last N days
    #[arg(long, value_name = "N", conflicts_with_all = ["this_year", "today"])]
    pub last_days: Option<u64>,

    /// Window from January 1st of this year to today
    #[arg(long, conflicts_with = "today")]
    pub this_year: bool,

    /// Window covering today only
    #[arg(long)]
    pub today: bool,

    /// Timestamp matched against the window (overrides config)
    #[arg(long, value_enum)]
    pub time_field: Option<TimeFieldArg>,
}

/// Overrides for the exclusion settings from the configuration.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Comma-separated file name globs to skip
    #[arg(long, value_name = "GLOBS")]
    pub exclude_files: Option<String>,

    /// Comma-separated directory name globs to prune
    #[arg(long, value_name = "GLOBS")]
    pub exclude_dirs: Option<String>,

    /// Comma-separated directory paths to prune
    #[arg(long, value_name = "PATHS")]
    pub exclude_paths: Option<String>,

    /// Skip hidden files and directories
    #[arg(long, overrides_with = "no_skip_hidden")]
    pub skip_hidden: bool,

    /// Include hidden files and directories
    #[arg(long, overrides_with = "skip_hidden")]
    pub no_skip_hidden: bool,

    /// Skip files smaller than this many KiB
    #[arg(long, value_name = "KB", conflicts_with = "no_min_size")]
    pub min_size_kb: Option<u64>,

    /// Disable the minimum size filter
    #[arg(long)]
    pub no_min_size: bool,
}

/// Report output control.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Report path (default: timestamped name in the current directory)
    #[arg(long, value_name = "PATH", conflicts_with = "no_report")]
    pub report: Option<PathBuf>,

    /// Do not write any report
    #[arg(long)]
    pub no_report: bool,

    /// Also write a narrative .txt report
    #[arg(long, overrides_with = "no_txt")]
    pub txt: bool,

    /// Do not write the narrative .txt report
    #[arg(long, overrides_with = "txt")]
    pub no_txt: bool,
}

impl ReportArgs {
    /// Resolve the `.txt` toggle against the configured default.
    #[must_use]
    pub const fn save_text(&self, configured: bool) -> bool {
        if self.txt {
            true
        } else if self.no_txt {
            false
        } else {
            configured
        }
    }
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Folder to scan (overrides config `source_folder`)
    pub source: Option<PathBuf>,

    #[command(flatten)]
    pub window: WindowArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Parser, Debug)]
pub struct ArchiveArgs {
    /// Folder to scan (overrides config `source_folder`)
    pub source: Option<PathBuf>,

    /// Archive folder (overrides config `archive_folder`); must exist
    #[arg(short, long, value_name = "DIR")]
    pub archive: Option<PathBuf>,

    /// Actually move the files; without it only a dry run is printed
    #[arg(short, long)]
    pub yes: bool,

    #[command(flatten)]
    pub window: WindowArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long, default_value = LOCAL_CONFIG_NAME)]
    pub output: PathBuf,

    /// Overwrite existing configuration
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate a configuration file
    Validate {
        /// Path to configuration file (default: discovered config)
        path: Option<PathBuf>,
    },

    /// Display the effective configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ConfigOutputFormat,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
