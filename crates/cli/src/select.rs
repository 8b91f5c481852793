// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test selection against a change set.
//!
//! A test runs when either:
//! 1. its own method body overlaps changed lines of its defining file, or
//! 2. its file lives under a test-directory prefix and matches a pending
//!    test path derived from a changed production file.
//!
//! Rule 2 is a naming-convention heuristic. Tests whose paths don't follow
//! the convention are not selected for production changes.

use std::collections::BTreeSet;

use tracing::debug;

use crate::changes::{ChangeSet, strip_extension};
use crate::identity::TestIdentity;

enum Scope<'a> {
    Changed(&'a ChangeSet),
    Everything,
}

/// Decides per test whether it should run for the current change.
pub struct Selector<'a> {
    scope: Scope<'a>,
    prefixes: &'a [String],
    test_file_prefixes: &'a [String],
    files_run: BTreeSet<String>,
}

impl<'a> Selector<'a> {
    /// Select tests affected by `changes`.
    ///
    /// `prefixes` are test-directory prefixes (e.g. `tests/`);
    /// `test_file_prefixes` are file-name prefixes (e.g. `test_`) ignored when
    /// matching a test file against pending test paths.
    pub fn new(
        changes: &'a ChangeSet,
        prefixes: &'a [String],
        test_file_prefixes: &'a [String],
    ) -> Self {
        Self {
            scope: Scope::Changed(changes),
            prefixes,
            test_file_prefixes,
            files_run: BTreeSet::new(),
        }
    }

    /// Select every test (used when the baseline could not be resolved).
    pub fn everything() -> Self {
        Self {
            scope: Scope::Everything,
            prefixes: &[],
            test_file_prefixes: &[],
            files_run: BTreeSet::new(),
        }
    }

    /// True if the test should be allowed to run.
    pub fn should_run(&mut self, test: &TestIdentity) -> bool {
        let changes = match self.scope {
            Scope::Changed(changes) => changes,
            Scope::Everything => return true,
        };

        let file = changes.relative(&test.source_file);
        let in_test_dir = self.prefixes.iter().any(|p| file.starts_with(p.as_str()));

        if let Some(lines) = changes.lines(&file)
            && test.lines.start <= test.lines.end
            && lines
                .range(test.lines.start..=test.lines.end)
                .next()
                .is_some()
        {
            debug!(test = %test, "selected: test source changed");
            if in_test_dir {
                self.files_run.insert(file);
            }
            return true;
        }

        if !in_test_dir {
            return false;
        }

        let candidates = self.candidates(&file);
        let stem = format!("{}/", strip_extension(&file));
        self.files_run.insert(file);

        let selected = changes.pending_test_paths().iter().any(|pending| {
            candidates.iter().any(|c| c.starts_with(pending.as_str()))
                || pending.starts_with(&stem)
        });
        if selected {
            debug!(test = %test, "selected: tested module changed");
        }
        selected
    }

    /// Test files seen under a test-directory prefix so far.
    pub fn files_run(&self) -> &BTreeSet<String> {
        &self.files_run
    }

    /// The test file path, plus variants with test file-name prefixes removed.
    fn candidates(&self, file: &str) -> Vec<String> {
        let (dir, name) = match file.rfind('/') {
            Some(slash) => file.split_at(slash + 1),
            None => ("", file),
        };

        let mut candidates = vec![file.to_string()];
        for prefix in self.test_file_prefixes {
            if let Some(rest) = name.strip_prefix(prefix.as_str())
                && !rest.is_empty()
            {
                candidates.push(format!("{dir}{rest}"));
            }
        }
        candidates
    }
}

#[cfg(test)]
#[path = "select_tests.rs"]
mod tests;
