// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Correlation of captured line executions with the change set.
//!
//! Tests and module imports are bracketed by capture start/stop. At the end of
//! each bracket the executed lines are intersected with the changed lines of
//! every tracked file. Test brackets classify changed lines per test
//! (covered or missing); import brackets are kept per module as an import-time
//! baseline that later counts for every test importing that module.
//!
//! Brackets nest (an import inside a test, an import inside an import), but
//! only the innermost one captures: opening a nested bracket stops and
//! harvests the enclosing one, and closing it restarts the enclosing one.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::capture::{Capture, LineTracer};
use crate::changes::ChangeSet;
use crate::error::{Error, Result};
use crate::identity::TestIdentity;

/// Root-relative file -> set of line numbers.
pub type FileLines = BTreeMap<String, BTreeSet<u32>>;

/// Covered/missing classification of the changed lines of one file.
///
/// Marking is monotone: once a line is covered it stays covered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMarks(BTreeMap<u32, bool>);

impl LineMarks {
    pub fn mark(&mut self, line: u32, covered: bool) {
        let entry = self.0.entry(line).or_insert(false);
        *entry |= covered;
    }

    pub fn get(&self, line: u32) -> Option<bool> {
        self.0.get(&line).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, bool)> + '_ {
        self.0.iter().map(|(l, c)| (*l, *c))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-test classification: test name -> file -> line marks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageSample {
    tests: BTreeMap<String, BTreeMap<String, LineMarks>>,
}

impl CoverageSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks for `(test, file)`, created empty on first access.
    pub fn file_mut(&mut self, test: &str, file: &str) -> &mut LineMarks {
        self.tests
            .entry(test.to_string())
            .or_default()
            .entry(file.to_string())
            .or_default()
    }

    pub fn mark(&mut self, test: &str, file: &str, line: u32, covered: bool) {
        self.file_mut(test, file).mark(line, covered);
    }

    /// Mark each changed line covered if it is in `covered`, missing otherwise.
    pub fn classify(
        &mut self,
        test: &str,
        file: &str,
        changed: &BTreeSet<u32>,
        covered: &BTreeSet<u32>,
    ) {
        let marks = self.file_mut(test, file);
        for &line in changed {
            marks.mark(line, covered.contains(&line));
        }
    }

    pub fn get(&self, test: &str, file: &str, line: u32) -> Option<bool> {
        self.tests.get(test)?.get(file)?.get(line)
    }

    pub fn tests(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, LineMarks>)> {
        self.tests.iter().map(|(t, f)| (t.as_str(), f))
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

/// Lines executed while each module was first imported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTimeCoverage {
    modules: BTreeMap<String, FileLines>,
}

impl ImportTimeCoverage {
    /// Keep the first capture for a module; later ones are ignored.
    pub fn record(&mut self, module: &str, hits: FileLines) -> bool {
        if self.modules.contains_key(module) {
            return false;
        }
        self.modules.insert(module.to_string(), hits);
        true
    }

    pub fn get(&self, module: &str) -> Option<&FileLines> {
        self.modules.get(module)
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }
}

enum Bracket {
    Test(TestIdentity),
    Import(String),
}

struct Frame {
    bracket: Bracket,
    hits: FileLines,
}

/// Drives the capture brackets and accumulates per-test coverage.
pub struct Correlator<'a, T> {
    changes: &'a ChangeSet,
    capture: Capture<T>,
    stack: Vec<Frame>,
    samples: CoverageSample,
    import_time: ImportTimeCoverage,
    test_modules: BTreeMap<String, BTreeSet<String>>,
    module_imports: BTreeMap<String, BTreeSet<String>>,
}

impl<'a, T: LineTracer> Correlator<'a, T> {
    pub fn new(changes: &'a ChangeSet, tracer: T) -> Self {
        Self {
            changes,
            capture: Capture::new(tracer),
            stack: Vec::new(),
            samples: CoverageSample::new(),
            import_time: ImportTimeCoverage::default(),
            test_modules: BTreeMap::new(),
            module_imports: BTreeMap::new(),
        }
    }

    /// Open a test bracket. Tests never overlap.
    pub fn start_test(&mut self, test: TestIdentity) -> Result<()> {
        if let Some(running) = self.running_test() {
            return Err(Error::Capture(format!(
                "test {test} started while {running} is running"
            )));
        }
        self.open(Bracket::Test(test))
    }

    /// Close the innermost bracket, which must be the test `test`.
    pub fn stop_test(&mut self, test: &TestIdentity) -> Result<()> {
        match self.stack.last().map(|f| &f.bracket) {
            Some(Bracket::Test(open)) if open == test => {}
            _ => {
                return Err(Error::Capture(format!(
                    "stop of test {test} does not match the open bracket"
                )));
            }
        }

        let frame = self.close()?;
        if let Bracket::Test(identity) = frame.bracket {
            self.record_test(&identity, frame.hits);
        }
        Ok(())
    }

    /// Open an import bracket for `module`.
    pub fn before_import(&mut self, module: &str) -> Result<()> {
        self.open(Bracket::Import(module.to_string()))
    }

    /// Close the innermost bracket, which must be the import of `module`.
    pub fn after_import(&mut self, module: &str) -> Result<()> {
        match self.stack.last().map(|f| &f.bracket) {
            Some(Bracket::Import(open)) if open == module => {}
            _ => {
                return Err(Error::Capture(format!(
                    "end of import {module} does not match the open bracket"
                )));
            }
        }

        let frame = self.close()?;
        if !self.import_time.record(module, frame.hits) {
            debug!(module, "import already captured, keeping first capture");
        }
        Ok(())
    }

    /// Import-time coverage captured so far.
    pub fn import_time(&self) -> &ImportTimeCoverage {
        &self.import_time
    }

    /// Per-test coverage captured so far, without import-time lines.
    pub fn samples(&self) -> &CoverageSample {
        &self.samples
    }

    pub fn capture(&self) -> &Capture<T> {
        &self.capture
    }

    pub fn tracer_mut(&mut self) -> &mut T {
        self.capture.tracer_mut()
    }

    /// Merge import-time coverage into every test that imported the module
    /// (directly or through other imports) and return the combined sample.
    pub fn finish(self) -> Result<CoverageSample> {
        if !self.stack.is_empty() {
            return Err(Error::Capture(format!(
                "{} capture bracket(s) still open at report time",
                self.stack.len()
            )));
        }

        let mut sample = self.samples;
        for (test, modules) in &self.test_modules {
            for module in import_closure(modules, &self.module_imports) {
                let Some(files) = self.import_time.get(&module) else {
                    continue;
                };
                for (file, covered) in files {
                    if covered.is_empty() {
                        continue;
                    }
                    if let Some(changed) = self.changes.lines(file) {
                        sample.classify(test, file, changed, covered);
                    }
                }
            }
        }
        Ok(sample)
    }

    fn running_test(&self) -> Option<&TestIdentity> {
        self.stack.iter().find_map(|f| match &f.bracket {
            Bracket::Test(t) => Some(t),
            Bracket::Import(_) => None,
        })
    }

    fn open(&mut self, bracket: Bracket) -> Result<()> {
        if !self.stack.is_empty() {
            self.capture.stop()?;
            let hits = self.harvest()?;
            self.capture.erase()?;
            if let Some(enclosing) = self.stack.last_mut() {
                merge_lines(&mut enclosing.hits, hits);
            }
        }

        if let (Some(enclosing), Bracket::Import(module)) = (self.stack.last(), &bracket) {
            let importer = match &enclosing.bracket {
                Bracket::Test(t) => self.test_modules.entry(t.test_name()),
                Bracket::Import(m) => self.module_imports.entry(m.clone()),
            };
            importer.or_default().insert(module.clone());
        }

        self.capture.erase()?;
        self.capture.start()?;
        self.stack.push(Frame {
            bracket,
            hits: FileLines::new(),
        });
        Ok(())
    }

    fn close(&mut self) -> Result<Frame> {
        self.capture.stop()?;
        let hits = self.harvest()?;
        self.capture.erase()?;

        let mut frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::Internal("no open capture bracket".to_string()))?;
        merge_lines(&mut frame.hits, hits);

        if !self.stack.is_empty() {
            self.capture.start()?;
        }
        Ok(frame)
    }

    /// Changed lines of tracked files executed during the last bracket.
    fn harvest(&self) -> Result<FileLines> {
        let mut hits = FileLines::new();
        for (file, changed) in self.changes.tracked() {
            let path = self.changes.root().join(file);
            if !path.is_file() {
                debug!(file, "changed file missing on disk, skipping");
                continue;
            }
            let Some(executed) = self.capture.executed_lines(&path)? else {
                continue;
            };
            let covered: BTreeSet<u32> = executed.intersection(changed).copied().collect();
            if !covered.is_empty() {
                hits.insert(file.to_string(), covered);
            }
        }
        Ok(hits)
    }

    fn record_test(&mut self, test: &TestIdentity, hits: FileLines) {
        let name = test.test_name();
        self.test_modules
            .entry(name.clone())
            .or_default()
            .insert(test.module.clone());

        for (file, covered) in hits {
            if let Some(changed) = self.changes.lines(&file) {
                self.samples.classify(&name, &file, changed, &covered);
            }
        }
    }
}

fn merge_lines(into: &mut FileLines, from: FileLines) {
    for (file, lines) in from {
        into.entry(file).or_default().extend(lines);
    }
}

/// Modules reachable from `roots` through recorded import edges.
fn import_closure(
    roots: &BTreeSet<String>,
    edges: &BTreeMap<String, BTreeSet<String>>,
) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut queue: Vec<&String> = roots.iter().collect();
    while let Some(module) = queue.pop() {
        if !seen.insert(module.clone()) {
            continue;
        }
        if let Some(children) = edges.get(module) {
            queue.extend(children.iter());
        }
    }
    seen
}

#[cfg(test)]
#[path = "correlate_tests.rs"]
mod tests;
