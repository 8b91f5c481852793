// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing with clap derive.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::{Config, split_prefixes};
use crate::git;
use crate::plan::{DiffSource, PlanOptions};

pub use crate::output::OutputFormat;

/// Run only the tests a change affects and measure coverage of the changed lines
#[derive(Parser)]
#[command(name = "quickunit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Use specific config file
    #[arg(short = 'C', long = "config", global = true, env = "QUICKUNIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr (overridden by QUICKUNIT_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the tests affected by the change
    Select(SelectArgs),
    /// Correlate a recorded test session with the change
    Report(ReportArgs),
    /// Show changed lines and candidate test paths
    Changes(ChangesArgs),
}

/// Options shared by every command that needs the change set.
#[derive(clap::Args, Clone, Default)]
pub struct BaselineArgs {
    /// Read the diff from FILE ("-" for stdin) instead of asking git
    #[arg(long, value_name = "FILE")]
    pub diff: Option<PathBuf>,

    /// Test-directory prefix; repeat, or separate several with newlines
    #[arg(long = "prefix", value_name = "PREFIX")]
    pub prefixes: Vec<String>,

    /// Branch the change is compared against
    #[arg(long, value_name = "BRANCH")]
    pub parent: Option<String>,

    /// Project root diff paths are relative to (default: git root)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl BaselineArgs {
    /// Merge flags over config values.
    pub fn plan_options(&self, config: &Config, cwd: &Path) -> PlanOptions {
        let root = match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => cwd.join(root),
            None => git::repo_root(cwd).unwrap_or_else(|| cwd.to_path_buf()),
        };

        let prefixes = if self.prefixes.is_empty() {
            config.select.prefixes.clone()
        } else {
            split_prefixes(&self.prefixes)
        };

        PlanOptions {
            root,
            parent: self
                .parent
                .clone()
                .unwrap_or_else(|| config.select.parent.clone()),
            prefixes,
            source: config.select.source.clone(),
            on_baseline_error: config.select.on_baseline_error,
            diff: DiffSource::from_arg(self.diff.as_deref()),
        }
    }
}

#[derive(clap::Args)]
pub struct SelectArgs {
    /// Test manifest (JSON) listing every collected test
    #[arg(long, value_name = "MANIFEST")]
    pub tests: PathBuf,

    #[command(flatten)]
    pub baseline: BaselineArgs,

    /// Print selected test names as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args)]
pub struct ReportArgs {
    /// Recorded session (JSON): test manifest plus lifecycle events
    #[arg(long, value_name = "FILE")]
    pub session: PathBuf,

    #[command(flatten)]
    pub baseline: BaselineArgs,

    /// Report destination: "-", sys://stdout, sys://stderr, or a file path
    #[arg(short, long, value_name = "DEST")]
    pub output: Option<String>,

    /// Report format
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

#[derive(clap::Args)]
pub struct ChangesArgs {
    #[command(flatten)]
    pub baseline: BaselineArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
