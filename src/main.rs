//! Functions Swagger - Command-line tool for generating Swagger 2.0 documents.
//!
//! Scans a function project for annotated HTTP-triggered functions and writes
//! the Swagger 2.0 document describing them.
//!
//! # Usage
//!
//! ```bash
//! functions-swagger [OPTIONS] --title <TITLE> --description <DESCRIPTION> --definition-name <NAME> <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Generate JSON for a local host:
//! ```bash
//! functions-swagger ./widgets --title "Widget API" --description "Widgets" --definition-name ApiDefinition
//! ```
//!
//! Generate YAML into a file:
//! ```bash
//! functions-swagger ./widgets -f yaml -o swagger.yaml --host widgets.example.net \
//!     --title "Widget API" --description "Widgets" --definition-name ApiDefinition
//! ```

use anyhow::Result;
use clap::Parser;
use functions_swagger::cli;
use log::info;

fn main() -> Result<()> {
    // Parse once so the verbose flag is known before the logger exists
    let parsed = cli::CliArgs::parse();

    let log_level = if parsed.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Functions Swagger starting...");

    let args = cli::parse_args_from_parsed(parsed)?;
    cli::run(args)?;

    info!("Swagger document generation completed successfully");

    Ok(())
}
