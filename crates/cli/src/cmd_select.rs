// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Select command implementation.

use std::io::Write;

use tracing::info;

use quickunit::cli::{Cli, SelectArgs};
use quickunit::discovery;
use quickunit::error::ExitCode;
use quickunit::identity::{TestIdentity, TestManifest, TestRegistry};
use quickunit::plan;

/// Run the select command.
pub fn run(cli: &Cli, args: &SelectArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = discovery::load_config(cli.config.as_deref(), &cwd)?;
    let opts = args.baseline.plan_options(&config, &cwd);

    let registry = TestRegistry::from_manifest(TestManifest::load(&args.tests)?)?;
    let plan = plan::begin(&opts)?;

    let mut selector = plan.selector(&opts.prefixes, &config.select.test_file_prefixes);
    let selected: Vec<String> = registry
        .tests()
        .filter(|test| selector.should_run(test))
        .map(TestIdentity::test_name)
        .collect();
    info!(
        selected = selected.len(),
        total = registry.len(),
        "tests selected"
    );

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        writeln!(handle, "{}", serde_json::to_string_pretty(&selected)?)?;
    } else {
        for name in &selected {
            writeln!(handle, "{}", name)?;
        }
    }
    Ok(ExitCode::Success)
}
