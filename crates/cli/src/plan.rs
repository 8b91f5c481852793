// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The begin phase: obtain the diff, build the change set, decide the scope.
//!
//! Without an explicit diff the baseline is the merge base of `HEAD` and the
//! parent branch, and the diff runs from there to the working tree. When that
//! fails, [`BaselinePolicy`] decides between aborting and running every test.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::changes::{ChangeSet, SourceFilter};
use crate::config::BaselinePolicy;
use crate::diff::DiffParser;
use crate::error::{Error, Result};
use crate::git;
use crate::select::Selector;

/// Where the diff text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffSource {
    /// Merge base with the parent branch, diffed against the working tree.
    Git,
    File(PathBuf),
    Stdin,
    Text(String),
}

impl DiffSource {
    /// `-` means stdin, anything else a file; no value means git.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => Self::Git,
            Some(path) if path.as_os_str() == "-" => Self::Stdin,
            Some(path) => Self::File(path.to_path_buf()),
        }
    }
}

/// Inputs of the begin phase.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub root: PathBuf,
    pub parent: String,
    pub prefixes: Vec<String>,
    pub source: Vec<String>,
    pub on_baseline_error: BaselinePolicy,
    pub diff: DiffSource,
}

/// Outcome of the begin phase.
#[derive(Debug, Clone)]
pub enum Plan {
    /// Gate tests on this change set.
    Selective(ChangeSet),
    /// The baseline was unavailable; every test runs.
    Everything { root: PathBuf },
}

impl Plan {
    pub fn changes(&self) -> Option<&ChangeSet> {
        match self {
            Plan::Selective(changes) => Some(changes),
            Plan::Everything { .. } => None,
        }
    }

    /// The change set to correlate against; empty when every test runs.
    pub fn into_changes(self) -> ChangeSet {
        match self {
            Plan::Selective(changes) => changes,
            Plan::Everything { root } => ChangeSet::empty(&root),
        }
    }

    pub fn selector<'a>(
        &'a self,
        prefixes: &'a [String],
        test_file_prefixes: &'a [String],
    ) -> Selector<'a> {
        match self {
            Plan::Selective(changes) => Selector::new(changes, prefixes, test_file_prefixes),
            Plan::Everything { .. } => Selector::everything(),
        }
    }
}

/// Run the begin phase.
pub fn begin(opts: &PlanOptions) -> Result<Plan> {
    let filter = SourceFilter::new(&opts.source)?;

    let text = match read_diff(opts) {
        Ok(text) => text,
        Err(err @ Error::Baseline(_)) => match opts.on_baseline_error {
            BaselinePolicy::Abort => return Err(err),
            BaselinePolicy::RunAll => {
                warn!(error = %err, "baseline unavailable, running every test");
                return Ok(Plan::Everything {
                    root: opts.root.clone(),
                });
            }
        },
        Err(err) => return Err(err),
    };

    let changes = ChangeSet::build(
        DiffParser::new(&text).files(),
        &opts.prefixes,
        &filter,
        &opts.root,
    );
    Ok(Plan::Selective(changes))
}

fn read_diff(opts: &PlanOptions) -> Result<String> {
    match &opts.diff {
        DiffSource::Git => {
            let rev = git::merge_base(&opts.root, &opts.parent)
                .map_err(|e| Error::Baseline(format!("{e:#}")))?;
            info!(parent = %opts.parent, rev = %rev, "parent revision identified");
            git::diff_since(&opts.root, &rev).map_err(|e| Error::Baseline(format!("{e:#}")))
        }
        DiffSource::File(path) => std::fs::read(path)
            .map(|bytes| decode_diff(&bytes))
            .map_err(|source| Error::Io {
                path: path.clone(),
                source,
            }),
        DiffSource::Stdin => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|source| Error::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(decode_diff(&bytes))
        }
        DiffSource::Text(text) => Ok(text.clone()),
    }
}

/// Diffs of non-UTF-8 sources still parse; undecodable bytes become U+FFFD.
fn decode_diff(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
