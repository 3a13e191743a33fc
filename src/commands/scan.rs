use std::io::Write;

use chrono::Local;

use crate::cli::{Cli, ReportArgs, ScanArgs};
use crate::config::{ArchiveConfig, validate_config_semantics};
use crate::job::Controller;
use crate::output::{ReportContext, ReportWriter, SummaryPrinter};
use crate::scanner::{ScanOutcome, ScanResult};
use crate::{EXIT_FAILURE, EXIT_SUCCESS, Result};

use super::context::{apply_overrides, fail, load_config, prepare_scan, run_scan_job};

#[must_use]
pub fn run_scan(args: &ScanArgs, cli: &Cli) -> i32 {
    match run_scan_impl(args, cli) {
        Ok(code) => code,
        Err(e) => fail(&e, cli),
    }
}

/// Scan for files inside the window and write the search report.
///
/// # Errors
/// Returns an error for invalid configuration, an unreadable source folder,
/// or a report that cannot be written.
pub fn run_scan_impl(args: &ScanArgs, cli: &Cli) -> Result<i32> {
    let mut config = load_config(cli)?.config;
    apply_overrides(&mut config, args.source.as_deref(), &args.window, &args.filters);
    validate_config_semantics(&config)?;
    let (criteria, exclusions) = prepare_scan(&config, &args.window)?;

    let controller = Controller::new();
    let ScanOutcome::Completed(result) =
        run_scan_job(&controller, criteria, exclusions, cli.quiet)?
    else {
        eprintln!("Scan cancelled.");
        return Ok(EXIT_FAILURE);
    };

    let printer = SummaryPrinter::new(cli.color.into());
    if !cli.quiet {
        printer.write_scan(&mut std::io::stdout().lock(), &result)?;
    }
    write_scan_report(&args.report, &config, &result, &printer, cli.quiet)?;
    Ok(EXIT_SUCCESS)
}

/// Write the search report unless `--no-report` was given.
///
/// # Errors
/// Returns an error if the report cannot be written.
pub(crate) fn write_scan_report(
    report: &ReportArgs,
    config: &ArchiveConfig,
    result: &ScanResult,
    printer: &SummaryPrinter,
    quiet: bool,
) -> Result<()> {
    if report.no_report {
        return Ok(());
    }
    let context = ReportContext {
        config,
        generated: Local::now(),
    };
    let path = report
        .report
        .clone()
        .unwrap_or_else(|| ReportWriter::default_scan_name(context.generated));
    let written = ReportWriter::new(report.save_text(config.save_txt_report))
        .write_scan(&path, result, &context)?;
    if !quiet {
        let mut stdout = std::io::stdout().lock();
        printer.write_report_paths(&mut stdout, &written)?;
        stdout.flush()?;
    }
    Ok(())
}
