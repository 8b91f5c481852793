// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Quickunit CLI entry point.

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt};

use quickunit::cli::{Cli, Command};
use quickunit::error::ExitCode;

mod cmd_changes;
mod cmd_report;
mod cmd_select;

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "off" };
    let filter =
        EnvFilter::try_from_env("QUICKUNIT_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("quickunit: {}", e);
            match e.downcast_ref::<quickunit::Error>() {
                Some(err) => ExitCode::from(err),
                None => ExitCode::InternalError,
            }
        }
    };

    std::process::exit(exit_code as i32);
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        None => {
            // Show help for bare invocation
            Cli::command().print_help()?;
            println!();
            Ok(ExitCode::Success)
        }
        Some(Command::Select(args)) => cmd_select::run(cli, args),
        Some(Command::Report(args)) => cmd_report::run(cli, args),
        Some(Command::Changes(args)) => cmd_changes::run(cli, args),
    }
}
