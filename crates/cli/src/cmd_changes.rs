// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Changes command implementation.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use termcolor::{StandardStream, WriteColor};

use quickunit::changes::ChangeSet;
use quickunit::cli::{ChangesArgs, Cli};
use quickunit::color::{Stream, resolve_color, scheme};
use quickunit::discovery;
use quickunit::error::ExitCode;
use quickunit::plan::{self, Plan};
use quickunit::report::format_ranges;

#[derive(Serialize)]
struct ChangesOutput<'a> {
    files: BTreeMap<&'a str, Vec<u32>>,
    new_files: Vec<&'a str>,
    pending: Vec<&'a str>,
}

impl<'a> From<&'a ChangeSet> for ChangesOutput<'a> {
    fn from(changes: &'a ChangeSet) -> Self {
        Self {
            files: changes
                .files()
                .map(|(file, lines)| (file, lines.iter().copied().collect()))
                .collect(),
            new_files: changes
                .files()
                .map(|(file, _)| file)
                .filter(|file| changes.is_new_file(file))
                .collect(),
            pending: changes
                .pending_test_paths()
                .iter()
                .map(String::as_str)
                .collect(),
        }
    }
}

/// Run the changes command.
pub fn run(cli: &Cli, args: &ChangesArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let config = discovery::load_config(cli.config.as_deref(), &cwd)?;
    let opts = args.baseline.plan_options(&config, &cwd);

    let plan = plan::begin(&opts)?;
    let changes = match &plan {
        Plan::Selective(changes) => changes,
        Plan::Everything { .. } => {
            eprintln!("quickunit: baseline unavailable, every test would run");
            return Ok(ExitCode::Success);
        }
    };

    if args.json {
        let output = ChangesOutput::from(changes);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::Success);
    }

    let mut out = StandardStream::stdout(resolve_color(Stream::Stdout));
    write_text(&mut out, changes)?;
    Ok(ExitCode::Success)
}

fn write_text<W: WriteColor>(out: &mut W, changes: &ChangeSet) -> std::io::Result<()> {
    for (file, lines) in changes.files() {
        out.set_color(&scheme::path())?;
        write!(out, "{}", file)?;
        out.reset()?;
        write!(out, ": ")?;
        out.set_color(&scheme::line_number())?;
        write!(out, "{}", format_ranges(lines))?;
        out.reset()?;
        if changes.is_new_file(file) {
            write!(out, " (new)")?;
        }
        writeln!(out)?;
    }

    for pending in changes.pending_test_paths() {
        writeln!(out, "pending: {}", pending)?;
    }
    Ok(())
}
