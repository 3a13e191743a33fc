use std::path::Path;

use crate::cli::{Cli, ConfigAction, ConfigArgs, ConfigOutputFormat};
use crate::config::{ConfigLoader, FileConfigLoader, LoadResult, validate_config_semantics};
use crate::{ArchiverError, EXIT_SUCCESS, Result};

use super::context::{fail, load_config};

#[must_use]
pub fn run_config(args: &ConfigArgs, cli: &Cli) -> i32 {
    let result = match &args.action {
        ConfigAction::Validate { path } => {
            run_config_validate_impl(path.as_deref().or(cli.config.as_deref())).map(|loaded| {
                if !cli.quiet {
                    println!("Configuration is valid: {}", describe_source(&loaded));
                }
            })
        }
        ConfigAction::Show { format } => load_config(cli)
            .and_then(|loaded| format_config(&loaded, *format))
            .map(|text| print!("{text}")),
    };
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => fail(&e, cli),
    }
}

/// Load and validate a configuration file, or the discovered one when
/// `path` is `None`.
///
/// # Errors
/// Returns an error if the file cannot be read, does not parse, or fails
/// semantic validation.
pub fn run_config_validate_impl(path: Option<&Path>) -> Result<LoadResult> {
    let loader = FileConfigLoader::new();
    let loaded = match path {
        Some(path) if !path.exists() => {
            return Err(ArchiverError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        Some(path) => loader.load_from_path(path)?,
        None => loader.load()?,
    };
    validate_config_semantics(&loaded.config)?;
    Ok(loaded)
}

/// Render the effective configuration.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn format_config(loaded: &LoadResult, format: ConfigOutputFormat) -> Result<String> {
    match format {
        ConfigOutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&loaded.config)?;
            out.push('\n');
            Ok(out)
        }
        ConfigOutputFormat::Text => {
            let body = toml::to_string_pretty(&loaded.config)
                .map_err(|e| ArchiverError::Config(e.to_string()))?;
            Ok(format!("# Source: {}\n{body}", describe_source(loaded)))
        }
    }
}

fn describe_source(loaded: &LoadResult) -> String {
    loaded.source.as_ref().map_or_else(
        || "built-in defaults".to_string(),
        |path| path.display().to_string(),
    )
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
