// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Change set construction.
//!
//! Reduces parsed diff records to `file -> changed lines` for recognised
//! source files, and derives candidate test paths from the changed production
//! files by joining each test-directory prefix with the file's extensionless
//! path (`pkg/foo.py` under `tests/` becomes `tests/pkg/foo`).

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info};

use crate::diff::FileDiff;
use crate::error::{Error, Result};

/// Matches paths of recognised source files.
#[derive(Debug, Clone)]
pub struct SourceFilter {
    set: GlobSet,
}

impl SourceFilter {
    /// Build a filter from glob patterns such as `**/*.py`.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| Error::Config {
                message: format!("invalid source pattern {pattern:?}: {e}"),
                path: None,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| Error::Config {
            message: e.to_string(),
            path: None,
        })?;
        Ok(Self { set })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}

/// Changed lines per root-relative source file, plus candidate test paths.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    root: PathBuf,
    files: BTreeMap<String, BTreeSet<u32>>,
    new_files: BTreeSet<String>,
    pending: BTreeSet<String>,
}

impl ChangeSet {
    /// A change set with no changes, rooted at `root`.
    pub fn empty(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ..Self::default()
        }
    }

    /// Build the change set from parsed diff records.
    ///
    /// Header records and deletions are skipped. New files contribute their
    /// lines but no candidate test paths, and are left out of coverage
    /// accounting (see [`ChangeSet::tracked`]).
    pub fn build<I>(diffs: I, prefixes: &[String], filter: &SourceFilter, root: &Path) -> Self
    where
        I: IntoIterator<Item = FileDiff>,
    {
        let mut changes = Self::empty(root);

        for file in diffs {
            if file.is_header || file.is_deleted_file {
                continue;
            }
            let Some(name) = file.new_filename.as_deref() else {
                continue;
            };
            let name = strip_vcs_prefix(name);

            if !filter.matches(name) {
                debug!(file = name, "ignoring non-source file");
                continue;
            }

            let lines: BTreeSet<u32> = file.hunks.iter().flat_map(|h| h.added_lines()).collect();
            if !lines.is_empty() {
                changes
                    .files
                    .entry(name.to_string())
                    .or_default()
                    .extend(lines);
            }

            if file.is_new_file {
                changes.new_files.insert(name.to_string());
                continue;
            }

            let stem = strip_extension(name);
            for prefix in prefixes {
                changes.pending.insert(join_prefix(prefix, stem));
            }
        }

        info!(
            root = %changes.root.display(),
            files = changes.files.len(),
            pending = changes.pending.len(),
            "found changed file(s) and possible test paths"
        );

        changes
    }

    /// Directory all file names are relative to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Changed lines of a root-relative file, including new files.
    pub fn lines(&self, file: &str) -> Option<&BTreeSet<u32>> {
        self.files.get(file)
    }

    /// True if the file was created by the change.
    pub fn is_new_file(&self, file: &str) -> bool {
        self.new_files.contains(file)
    }

    /// All changed files, including new files.
    pub fn files(&self) -> impl Iterator<Item = (&str, &BTreeSet<u32>)> {
        self.files.iter().map(|(f, l)| (f.as_str(), l))
    }

    /// Changed files that existed before the change, for coverage accounting.
    pub fn tracked(&self) -> impl Iterator<Item = (&str, &BTreeSet<u32>)> {
        self.files().filter(|(f, _)| !self.new_files.contains(*f))
    }

    /// Candidate test-path stems for the changed production files.
    pub fn pending_test_paths(&self) -> &BTreeSet<String> {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.pending.is_empty()
    }

    /// Express `path` relative to the change set root, with `/` separators.
    ///
    /// Relative paths are taken as already root-relative; absolute paths
    /// outside the root are returned unchanged.
    pub fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel = rel.strip_prefix("./").unwrap_or(rel);
        rel.to_string_lossy().replace('\\', "/")
    }
}

/// Drop the `a/` or `b/` prefix git puts on diff paths.
pub(crate) fn strip_vcs_prefix(name: &str) -> &str {
    name.strip_prefix("b/")
        .or_else(|| name.strip_prefix("a/"))
        .unwrap_or(name)
}

/// Remove the file extension, leaving dots in directory names alone.
pub(crate) fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') && dot > 0 && !path[..dot].ends_with('/') => {
            &path[..dot]
        }
        _ => path,
    }
}

/// Join a test-directory prefix and a relative path.
fn join_prefix(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else if prefix.ends_with('/') {
        format!("{prefix}{path}")
    } else {
        format!("{prefix}/{path}")
    }
}

#[cfg(test)]
#[path = "changes_tests.rs"]
mod tests;
