//! sailgen CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Definition or resolution error
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sail_render::RenderError;
use sail_resolver::ResolveError;
use sail_spec::SpecError;

mod commands;
mod config;

use commands::{Cli, Commands};
use config::ConfigError;

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const DEFINITION_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

/// Log targets raised to the command-line level.
const LOG_TARGETS: [&str; 4] = ["sailgen", "sail_spec", "sail_resolver", "sail_render"];

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, config, cli.quiet),
        Commands::Check(args) => commands::check::execute(args, config, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), verbose, quiet);

    // stdout carries the summary
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// A valid `RUST_LOG` is used as-is; otherwise the defaults follow `-v`/`-q`.
fn log_filter(rust_log: Option<&str>, verbose: bool, quiet: bool) -> EnvFilter {
    if let Some(filter) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
    {
        return filter;
    }
    EnvFilter::new(default_directives(verbose, quiet))
}

fn default_directives(verbose: bool, quiet: bool) -> String {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let mut directives = String::from("warn");
    for target in LOG_TARGETS {
        directives.push_str(&format!(",{}={}", target, level));
    }
    directives
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ExitCodes::INVALID_ARGS;
        }
        if let Some(render) = cause.downcast_ref::<RenderError>() {
            return match render.root() {
                RenderError::Template(_) | RenderError::Rendering { .. } => {
                    ExitCodes::TEMPLATE_ERROR
                }
                RenderError::Resolve(_)
                | RenderError::Spec(_)
                | RenderError::UnsupportedKind { .. } => ExitCodes::DEFINITION_ERROR,
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
        if cause.downcast_ref::<ResolveError>().is_some()
            || cause.downcast_ref::<SpecError>().is_some()
        {
            return ExitCodes::DEFINITION_ERROR;
        }
    }
    ExitCodes::GENERAL_ERROR
}
