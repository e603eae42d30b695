//! CLI argument definitions using clap
//!
//! Commands:
//! - recordkit serve [--config <path>] [--port <n>] [--users-file <path>]
//! - recordkit validate <schema> [--catalog <name>] [--by-alias]
//! - recordkit describe <schema> [--catalog <name>]
//! - recordkit demo

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// recordkit - Declarative record schemas and a user registration service
#[derive(Parser, Debug)]
#[command(name = "recordkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Which built-in schema registry to use
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CatalogName {
    /// Product, Order, Signup, Person, Employee, Admin and their User
    #[default]
    Showcase,
    /// The User accepted by the registration endpoint
    Registration,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the registration HTTP server
    Serve {
        /// Path to configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port override
        #[arg(long)]
        port: Option<u16>,

        /// Users file override
        #[arg(long)]
        users_file: Option<PathBuf>,
    },

    /// Validate one JSON object from stdin and print the record mapping
    Validate {
        /// Schema name, e.g. Product
        schema: String,

        #[arg(long, value_enum, default_value_t = CatalogName::Showcase)]
        catalog: CatalogName,

        /// Emit declared aliases instead of field names
        #[arg(long)]
        by_alias: bool,
    },

    /// Print a schema's field descriptors
    Describe {
        /// Schema name, e.g. Order
        schema: String,

        #[arg(long, value_enum, default_value_t = CatalogName::Showcase)]
        catalog: CatalogName,
    },

    /// Run the showcase scenarios and print their results
    Demo,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
