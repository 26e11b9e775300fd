use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wl_cli::commands::{check, day, report};
use wl_cli::{Cli, Commands, Config};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; parse warnings are shown by default
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Logs go to stderr so reports on stdout stay clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Report(args)) => {
            report::run(&mut stdout, args, &config)?;
        }
        Some(Commands::Day { spec, offset }) => {
            day::run(&mut stdout, spec.as_deref(), *offset)?;
        }
        Some(Commands::Check { file }) => {
            let clean = check::run(&mut stdout, file.as_deref(), &config)?;
            if !clean {
                return Ok(ExitCode::FAILURE);
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(ExitCode::SUCCESS)
}
