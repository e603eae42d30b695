//! CLI module for recordkit
//!
//! Provides command-line interface for:
//! - serve: Run the registration HTTP server
//! - validate: One-shot record construction from stdin
//! - describe: Print schema descriptors
//! - demo: Run the showcase scenarios

mod args;
mod commands;
mod errors;
mod io;

pub use args::{CatalogName, Cli, Command};
pub use commands::{
    demo, describe, describe_to, load_catalog, resolve_config, run, run_command, serve, validate,
    validate_with,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request_from, write_error_to, write_response_to};
