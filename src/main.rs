use clap::Parser;

use stale_archiver::cli::{Cli, Commands};
use stale_archiver::commands::{run_archive, run_config, run_init, run_scan};
use stale_archiver::logging;
use stale_archiver::output::ColorMode;

fn main() {
    let cli = Cli::parse();

    let ansi = ColorMode::from(cli.color).enabled_for(&std::io::stderr());
    logging::init(cli.verbose, cli.quiet, ansi);

    let exit_code = match &cli.command {
        Commands::Scan(args) => run_scan(args, &cli),
        Commands::Archive(args) => run_archive(args, &cli),
        Commands::Init(args) => run_init(args, &cli),
        Commands::Config(args) => run_config(args, &cli),
    };

    std::process::exit(exit_code);
}
