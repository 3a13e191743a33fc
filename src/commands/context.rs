use std::path::Path;

use chrono::{Local, NaiveDate};

use crate::cli::{Cli, FilterArgs, WindowArgs};
use crate::config::{ArchiveConfig, ConfigLoader, FileConfigLoader, LoadResult};
use crate::error::{ArchiverError, Result};
use crate::job::Controller;
use crate::output::{ErrorOutput, JobProgress};
use crate::path_utils::CasePolicy;
use crate::scanner::{
    ExclusionConfig, ScanCriteria, ScanOutcome, last_days, parse_date, this_year,
};
use crate::EXIT_CONFIG_ERROR;

/// Window length used when no window flag is given.
pub const DEFAULT_WINDOW_DAYS: u64 = 365;

/// Render `err` on stderr and map it to the configuration/runtime exit code.
pub(crate) fn fail(err: &ArchiverError, cli: &Cli) -> i32 {
    ErrorOutput::new(cli.color.into()).report(err);
    EXIT_CONFIG_ERROR
}

/// Load configuration honoring `--config` and `--no-config`.
///
/// # Errors
/// Returns an error if the configuration file cannot be read or parsed.
pub(crate) fn load_config(cli: &Cli) -> Result<LoadResult> {
    if cli.no_config {
        return Ok(LoadResult {
            config: ArchiveConfig::default(),
            source: None,
        });
    }
    let loader = FileConfigLoader::new();
    cli.config
        .as_deref()
        .map_or_else(|| loader.load(), |path| loader.load_from_path(path))
}

/// Apply command-line overrides on top of the loaded configuration.
pub(crate) fn apply_overrides(
    config: &mut ArchiveConfig,
    source: Option<&Path>,
    window: &WindowArgs,
    filters: &FilterArgs,
) {
    if let Some(source) = source {
        config.source_folder = Some(source.to_path_buf());
    }
    if let Some(field) = window.time_field {
        config.time_type = field.into();
    }
    if let Some(files) = &filters.exclude_files {
        config.exclude_files.clone_from(files);
    }
    if let Some(dirs) = &filters.exclude_dirs {
        config.exclude_dirs.clone_from(dirs);
    }
    if let Some(paths) = &filters.exclude_paths {
        config.exclude_paths.clone_from(paths);
    }
    if filters.skip_hidden {
        config.skip_hidden = true;
    } else if filters.no_skip_hidden {
        config.skip_hidden = false;
    }
    if let Some(kb) = filters.min_size_kb {
        config.exclude_small = true;
        config.min_size_kb = kb;
    } else if filters.no_min_size {
        config.exclude_small = false;
    }
}

/// First and last day of the requested window.
///
/// # Errors
/// Returns `InvalidDate` when `--from` or `--to` does not parse.
pub(crate) fn resolve_window(window: &WindowArgs, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
    if let Some(from) = &window.from {
        let start = parse_date(from)?;
        let end = window.to.as_deref().map(parse_date).transpose()?.unwrap_or(today);
        return Ok((start, end));
    }
    if let Some(days) = window.last_days {
        return Ok(last_days(today, days));
    }
    if window.this_year {
        return Ok(this_year(today));
    }
    if window.today {
        return Ok((today, today));
    }
    Ok(last_days(today, DEFAULT_WINDOW_DAYS))
}

/// Build the scan inputs from the effective configuration.
///
/// # Errors
/// Returns an error if no source folder is set, the window is invalid, or a
/// pattern fails to compile.
pub(crate) fn prepare_scan(
    config: &ArchiveConfig,
    window: &WindowArgs,
) -> Result<(ScanCriteria, ExclusionConfig)> {
    let source = config.source_folder.as_deref().ok_or_else(|| {
        ArchiverError::Config(
            "no source folder: pass it as an argument or set source_folder".to_string(),
        )
    })?;
    let (start, end) = resolve_window(window, Local::now().date_naive())?;
    let criteria = ScanCriteria::for_days(source, config.time_type, start, end)?;
    let exclusions = ExclusionConfig::compile(
        &config.exclusion_rules(),
        criteria.source_root(),
        CasePolicy::native(),
    )?;
    Ok((criteria, exclusions))
}

/// Run a scan on `controller`, showing progress until it ends.
///
/// # Errors
/// Returns the scan's fatal error, or `JobAlreadyRunning`.
pub(crate) fn run_scan_job(
    controller: &Controller,
    criteria: ScanCriteria,
    exclusions: ExclusionConfig,
    quiet: bool,
) -> Result<ScanOutcome> {
    tracing::info!(source = %criteria.source_root().display(), "Starting scan");
    let handle = controller.start_scan(criteria, exclusions)?;
    let progress = JobProgress::new(quiet);
    let outcome = handle.wait_with(|event| progress.handle(&event));
    progress.finish();
    outcome
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
