//! recordkit CLI entry point
//!
//! Parsing, configuration and server startup all live in the CLI module.
//! This file only reports the final error and sets the exit code.

use recordkit::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
