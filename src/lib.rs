pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod mover;
pub mod output;
pub mod path_utils;
pub mod scanner;

pub use error::{ArchiverError, Result};

pub const EXIT_SUCCESS: i32 = 0;
/// A job ran but some files failed to move, or it was cancelled or stopped.
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;
