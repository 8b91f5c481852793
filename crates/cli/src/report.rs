// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diff coverage report.
//!
//! Flattens a [`CoverageSample`] into `test -> file -> line -> 0|1` and counts
//! the leaves. Line numbers serialize as JSON object keys.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::correlate::CoverageSample;

/// `line -> 0|1` for one file of one test.
pub type LineFlags = BTreeMap<u32, u8>;

/// `test -> file -> line -> 0|1`.
pub type TestCoverage = BTreeMap<String, BTreeMap<String, LineFlags>>;

/// Global leaf counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub covered: u64,
    pub total: u64,
}

impl Stats {
    /// Covered share in percent. An empty report counts as fully covered.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.covered as f64 * 100.0 / self.total as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub stats: Stats,
    pub tests: TestCoverage,
}

impl Report {
    /// Build a report from merged per-test coverage.
    ///
    /// Files without any classified line are left out, as are tests left
    /// without files.
    pub fn from_sample(sample: &CoverageSample) -> Self {
        let mut tests = TestCoverage::new();
        for (test, files) in sample.tests() {
            let files: BTreeMap<String, LineFlags> = files
                .iter()
                .filter(|(_, marks)| !marks.is_empty())
                .map(|(file, marks)| {
                    let flags = marks.iter().map(|(l, c)| (l, u8::from(c))).collect();
                    (file.clone(), flags)
                })
                .collect();
            if !files.is_empty() {
                tests.insert(test.to_string(), files);
            }
        }
        Self::from_tests(tests)
    }

    /// Wrap `tests`, computing the stats from its leaves.
    pub fn from_tests(tests: TestCoverage) -> Self {
        let stats = count(&tests);
        Self { stats, tests }
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Changed lines, per file, that no test covered.
    pub fn missing_lines(&self) -> BTreeMap<String, BTreeSet<u32>> {
        let mut covered: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
        let mut seen: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();
        for files in self.tests.values() {
            for (file, flags) in files {
                for (&line, &flag) in flags {
                    seen.entry(file).or_default().insert(line);
                    if flag != 0 {
                        covered.entry(file).or_default().insert(line);
                    }
                }
            }
        }

        seen.into_iter()
            .filter_map(|(file, lines)| {
                let missing: BTreeSet<u32> = match covered.get(file) {
                    Some(hit) => lines.difference(hit).copied().collect(),
                    None => lines,
                };
                (!missing.is_empty()).then(|| (file.to_string(), missing))
            })
            .collect()
    }
}

fn count(tests: &TestCoverage) -> Stats {
    let mut stats = Stats::default();
    for flags in tests.values().flat_map(BTreeMap::values) {
        stats.total += flags.len() as u64;
        stats.covered += flags.values().filter(|f| **f != 0).count() as u64;
    }
    stats
}

/// Render sorted line numbers with consecutive runs collapsed (`3-5, 9`).
pub fn format_ranges(lines: &BTreeSet<u32>) -> String {
    let mut parts = Vec::new();
    let mut iter = lines.iter().copied();
    let Some(mut start) = iter.next() else {
        return String::new();
    };
    let mut end = start;
    for line in iter {
        if line == end + 1 {
            end = line;
            continue;
        }
        parts.push(render_range(start, end));
        start = line;
        end = line;
    }
    parts.push(render_range(start, end));
    parts.join(", ")
}

fn render_range(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
