//! merkdir CLI Binary
//!
//! Command-line interface for building directory Merkle trees and proving
//! file inclusion.

use clap::Parser;
use merkdir::cli::{Cli, CommandOutput, RunContext};
use merkdir::config::ConfigLoader;
use merkdir::logging::{init_logging, LoggingConfig};
use std::io::Write;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("merkdir starting");

    let context = match RunContext::new(cli.config.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", merkdir::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            if let Err(e) = print_output(output) {
                eprintln!("Failed to write output: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", merkdir::cli::map_error(&e));
            process::exit(1);
        }
    }
}

fn print_output(output: CommandOutput) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match output {
        CommandOutput::Text(text) => writeln!(stdout, "{}", text)?,
        CommandOutput::Bytes(bytes) => stdout.write_all(&bytes)?,
        CommandOutput::Empty => {}
    }
    stdout.flush()
}

/// Build logging configuration from CLI args, environment, and config file
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    // Logging stays off unless asked for
    if !cli.verbose && cli.log_level.is_none() {
        return LoggingConfig::disabled();
    }

    let mut config = ConfigLoader::load(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();

    // Override with CLI arguments (highest priority)
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }

    config
}
