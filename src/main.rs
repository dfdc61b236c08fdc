//! docguard - documentation policy checker and TODO pruner.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docguard::cli::{self, check::Overrides, Cli, Commands};
use docguard::config::Config;
use docguard::Error;

/// Exit status for fatal errors, distinct from "policy failed" (1).
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the report.
    let default_level = if cli.verbose {
        "docguard=debug"
    } else {
        "docguard=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: Cli) -> Result<bool, Error> {
    let config = Config::load(&cli.root, cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            docs_dir,
            max_children,
            max_lines,
            exempt,
            readme_name,
            format,
        } => {
            let policy = Overrides {
                docs_dir,
                max_children,
                max_lines,
                exempt,
                readme_name,
            }
            .apply(config.docs);
            cli::check::run(&cli.root, &policy, format)
        }
        Commands::Prune { path, check } => {
            let path = path.unwrap_or(config.todo.path);
            cli::prune::run(&cli.root, &path, check)
        }
    }
}
