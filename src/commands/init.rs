use std::fs;
use std::path::Path;

use crate::cli::{Cli, InitArgs};
use crate::config::{DEFAULT_EXCLUDE_DIRS, DEFAULT_EXCLUDE_FILES, DEFAULT_MIN_SIZE_KB};
use crate::{ArchiverError, EXIT_SUCCESS, Result};

use super::context::fail;

#[must_use]
pub fn run_init(args: &InitArgs, cli: &Cli) -> i32 {
    match run_init_impl(args) {
        Ok(()) => {
            if !cli.quiet {
                println!("Created configuration file: {}", args.output.display());
            }
            EXIT_SUCCESS
        }
        Err(e) => fail(&e, cli),
    }
}

/// Write the commented configuration template.
///
/// # Errors
/// Returns an error if the file already exists (without --force) or cannot be written.
pub fn run_init_impl(args: &InitArgs) -> Result<()> {
    write_template(&args.output, args.force)
}

fn write_template(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ArchiverError::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            path.display()
        )));
    }
    fs::write(path, generate_config_template()).map_err(|source| ArchiverError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

#[must_use]
pub fn generate_config_template() -> String {
    format!(
        r#"# stale-archiver configuration file
# Every key is optional; missing keys take the values shown here.

# Folder to scan (or pass it on the command line)
# source_folder = "/data/projects"

# Folder that receives archived files; it must already exist
# archive_folder = "/mnt/archive"

# Timestamp matched against the window: "modified", "accessed" or "created"
time_type = "modified"

# Skip hidden files and do not descend into hidden directories
skip_hidden = true

# Comma-separated file name globs to skip
exclude_files = "{DEFAULT_EXCLUDE_FILES}"

# Comma-separated directory name globs to prune at any depth
exclude_dirs = "{DEFAULT_EXCLUDE_DIRS}"

# Comma-separated directory paths to prune, absolute or relative to the source folder
exclude_paths = ""

# Skip files smaller than min_size_kb
exclude_small = false
min_size_kb = {DEFAULT_MIN_SIZE_KB}

# Write a narrative .txt report next to every JSON report
save_txt_report = true
"#
    )
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
