// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared unit test utilities.
//!
//! Provides common helpers for unit tests in the cli crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::changes::{ChangeSet, SourceFilter};
use crate::diff::DiffParser;
use crate::identity::{LineRange, TestIdentity};

/// Creates a temp directory with a minimal quickunit.toml.
pub fn temp_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("quickunit.toml"), "version = 1\n").unwrap();
    dir
}

/// Creates a directory tree from a list of (path, content) pairs.
///
/// Parent directories are created automatically.
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

/// Builds a change set for `diff` rooted at `root`, treating `*.py` as source
/// and `tests/` as the only test prefix.
pub fn python_changes(diff: &str, root: &Path) -> ChangeSet {
    let filter = SourceFilter::new(&["**/*.py".to_string()]).unwrap();
    ChangeSet::build(
        DiffParser::new(diff).files(),
        &["tests/".to_string()],
        &filter,
        root,
    )
}

/// A test identity defined in `module` (dotted), inside class `Case`.
pub fn identity(module: &str, method: &str) -> TestIdentity {
    TestIdentity {
        module: module.to_string(),
        class: Some("Case".to_string()),
        method: method.to_string(),
        source_file: PathBuf::from(format!("{}.py", module.replace('.', "/"))),
        lines: LineRange { start: 1, end: 5 },
    }
}
