use std::io::Write;
use std::path::Path;

use chrono::Local;

use crate::cli::{ArchiveArgs, Cli};
use crate::config::validate_config_semantics;
use crate::error::ArchiverError;
use crate::job::Controller;
use crate::mover::MoveResult;
use crate::output::{JobProgress, ReportContext, ReportWriter, SummaryPrinter};
use crate::scanner::ScanOutcome;
use crate::{EXIT_FAILURE, EXIT_SUCCESS, Result};

use super::context::{apply_overrides, fail, load_config, prepare_scan, run_scan_job};
use super::scan::write_scan_report;

#[must_use]
pub fn run_archive(args: &ArchiveArgs, cli: &Cli) -> i32 {
    match run_archive_impl(args, cli) {
        Ok(code) => code,
        Err(e) => fail(&e, cli),
    }
}

/// Scan, then move the found files into the archive folder.
///
/// Without `--yes` nothing is moved: the files are listed and the search
/// report is written instead.
///
/// # Errors
/// Returns an error for invalid configuration, a missing source or archive
/// folder, or a report that cannot be written.
pub fn run_archive_impl(args: &ArchiveArgs, cli: &Cli) -> Result<i32> {
    let mut config = load_config(cli)?.config;
    apply_overrides(&mut config, args.source.as_deref(), &args.window, &args.filters);
    if let Some(archive) = &args.archive {
        config.archive_folder = Some(archive.clone());
    }
    validate_config_semantics(&config)?;
    let archive_root = config.archive_folder.clone().ok_or_else(|| {
        ArchiverError::Config(
            "no archive folder: pass --archive or set archive_folder".to_string(),
        )
    })?;
    ensure_archive_root(&archive_root)?;
    let (criteria, exclusions) = prepare_scan(&config, &args.window)?;

    let controller = Controller::new();
    let ScanOutcome::Completed(scan) =
        run_scan_job(&controller, criteria, exclusions, cli.quiet)?
    else {
        eprintln!("Scan cancelled.");
        return Ok(EXIT_FAILURE);
    };

    let printer = SummaryPrinter::new(cli.color.into());
    let mut stdout = std::io::stdout().lock();
    if !cli.quiet {
        printer.write_scan(&mut stdout, &scan)?;
    }
    if scan.is_empty() {
        if !cli.quiet {
            writeln!(stdout, "Nothing to archive.")?;
        }
        return Ok(EXIT_SUCCESS);
    }
    if !args.yes {
        printer.write_dry_run(&mut stdout, &scan, &archive_root)?;
        drop(stdout);
        write_scan_report(&args.report, &config, &scan, &printer, cli.quiet)?;
        return Ok(EXIT_SUCCESS);
    }
    drop(stdout);

    let result = run_move_job(&controller, &archive_root, cli.quiet)?;
    if !cli.quiet {
        printer.write_move(&mut std::io::stdout().lock(), &result)?;
    }

    if !args.report.no_report {
        let context = ReportContext {
            config: &config,
            generated: Local::now(),
        };
        let path = args
            .report
            .report
            .clone()
            .unwrap_or_else(|| ReportWriter::default_move_name(context.generated));
        let written = ReportWriter::new(args.report.save_text(config.save_txt_report))
            .write_move(&path, &result, &context)?;
        if !cli.quiet {
            printer.write_report_paths(&mut std::io::stdout().lock(), &written)?;
        }
    }

    Ok(if result.is_clean() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

/// The archive folder is never created on the user's behalf.
fn ensure_archive_root(archive_root: &Path) -> Result<()> {
    if archive_root.is_dir() {
        Ok(())
    } else {
        Err(ArchiverError::ArchiveRootUnavailable {
            path: archive_root.to_path_buf(),
        })
    }
}

fn run_move_job(controller: &Controller, archive_root: &Path, quiet: bool) -> Result<MoveResult> {
    tracing::info!(archive = %archive_root.display(), "Starting move");
    let handle = controller.start_move(archive_root)?;
    let progress = JobProgress::new(quiet);
    let result = handle.wait_with(|event| progress.handle(&event));
    progress.finish();
    result
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
