//! tarsubset CLI - carve a small fixed subset out of a large corpus archive.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match run(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli, formatter: &dyn output::OutputFormatter) -> Result<()> {
    let show_progress = !cli.quiet && !cli.json;

    match &cli.command {
        None => commands::build::execute(&cli.build, formatter, show_progress),
        Some(cli::Commands::Build(args)) => {
            commands::build::execute(args, formatter, show_progress)
        }
        Some(cli::Commands::List(args)) => commands::list::execute(args, formatter),
        Some(cli::Commands::Synth(args)) => commands::synth::execute(args, formatter),
        Some(cli::Commands::Completion { shell }) => {
            commands::completion::execute(*shell);
            Ok(())
        }
    }
}

/// Routes `log` records from the core library to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
