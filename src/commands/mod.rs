pub mod archive;
pub mod config;
pub(crate) mod context;
pub mod init;
pub mod scan;

pub use archive::{run_archive, run_archive_impl};
pub use config::{format_config, run_config, run_config_validate_impl};
pub use init::{generate_config_template, run_init, run_init_impl};
pub use scan::{run_scan, run_scan_impl};
