// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Recorded test sessions.
//!
//! A session is the test manifest plus the ordered lifecycle events a host
//! runner observed:
//!
//! ```json
//! {
//!   "tests": [{"module": "tests.test_foo", "class": "Case", "method": "test_a",
//!              "source_file": "tests/test_foo.py", "lines": {"start": 4, "end": 9}}],
//!   "aliases": {"tests.test_bar:Case.test_a": "tests.test_foo:Case.test_a"},
//!   "events": [
//!     {"event": "before_import", "module": "tests.test_foo"},
//!     {"event": "executed", "file": "pkg/foo.py", "lines": [1, 2]},
//!     {"event": "after_import", "module": "tests.test_foo"},
//!     {"event": "start_test", "test": "tests.test_foo:Case.test_a"},
//!     {"event": "stop_test", "test": "tests.test_foo:Case.test_a"}
//!   ]
//! }
//! ```
//!
//! Replaying feeds the events through a [`Correlator`] backed by a
//! [`RecordingTracer`]. `executed` events outside any bracket are dropped.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capture::RecordingTracer;
use crate::changes::ChangeSet;
use crate::correlate::{CoverageSample, Correlator};
use crate::error::{Error, Result};
use crate::identity::{TestIdentity, TestManifest, TestRegistry};

/// One lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    BeforeImport { module: String },
    AfterImport { module: String },
    StartTest { test: String },
    StopTest { test: String },
    /// Lines of `file` (root-relative or absolute) ran.
    Executed { file: PathBuf, lines: Vec<u32> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub manifest: TestManifest,
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Session {
    /// Load a session from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
            .map_err(|e| Error::Session(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Replay the events against `changes` and return the merged coverage.
    pub fn replay(&self, changes: &ChangeSet) -> Result<CoverageSample> {
        let registry = TestRegistry::from_manifest(self.manifest.clone())?;
        let mut correlator = Correlator::new(changes, RecordingTracer::new());

        for (index, event) in self.events.iter().enumerate() {
            match event {
                Event::BeforeImport { module } => correlator.before_import(module)?,
                Event::AfterImport { module } => correlator.after_import(module)?,
                Event::StartTest { test } => {
                    let identity = resolve(&registry, test, index)?;
                    correlator.start_test(identity.clone())?;
                }
                Event::StopTest { test } => {
                    let identity = resolve(&registry, test, index)?;
                    correlator.stop_test(identity)?;
                }
                Event::Executed { file, lines } => {
                    let path = if file.is_absolute() {
                        file.clone()
                    } else {
                        changes.root().join(file)
                    };
                    correlator.tracer_mut().hit(path, lines.iter().copied());
                }
            }
        }

        debug!(events = self.events.len(), "session replayed");
        correlator.finish()
    }
}

fn resolve<'r>(registry: &'r TestRegistry, name: &str, index: usize) -> Result<&'r TestIdentity> {
    registry
        .resolve(name)
        .ok_or_else(|| Error::Session(format!("event {index}: unknown test {name}")))
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
