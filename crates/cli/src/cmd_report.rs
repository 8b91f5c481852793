// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report command implementation.

use tracing::info;

use quickunit::cli::{Cli, ReportArgs};
use quickunit::discovery;
use quickunit::error::ExitCode;
use quickunit::output::ReportDestination;
use quickunit::plan;
use quickunit::report::Report;
use quickunit::session::Session;

/// Run the report command.
pub fn run(cli: &Cli, args: &ReportArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = discovery::load_config(cli.config.as_deref(), &cwd)?;
    let opts = args.baseline.plan_options(&config, &cwd);

    // Output settings: CLI flags override config
    let destination: ReportDestination = args
        .output
        .as_deref()
        .unwrap_or(&config.report.output)
        .parse()?;
    let format = args.format.unwrap_or(config.report.format);

    let session = Session::load(&args.session)?;
    let changes = plan::begin(&opts)?.into_changes();
    let sample = session.replay(&changes)?;

    let report = Report::from_sample(&sample);
    info!(
        covered = report.stats.covered,
        total = report.stats.total,
        "coverage against diff"
    );

    destination.write(&report, format)?;
    Ok(ExitCode::Success)
}
