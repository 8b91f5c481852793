// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Git access for the baseline revision and the diff against it.
//!
//! Uses git2 (libgit2) for all git operations to avoid subprocess overhead.
//! The diff is rendered as unified patch text so that it goes through the same
//! parser as a diff supplied by the host.

use std::path::{Path, PathBuf};

use anyhow::Context;
use git2::{DiffFormat, DiffOptions, Repository};

/// Working directory of the repository containing `path`.
pub fn repo_root(path: &Path) -> Option<PathBuf> {
    let repo = Repository::discover(path).ok()?;
    repo.workdir().map(Path::to_path_buf)
}

/// Merge base of `HEAD` and `parent`, as a full hex object id.
pub fn merge_base(root: &Path, parent: &str) -> anyhow::Result<String> {
    let repo = Repository::discover(root).context("Failed to open repository")?;

    let parent_oid = repo
        .revparse_single(parent)
        .with_context(|| format!("Failed to resolve parent branch: {}", parent))?
        .peel_to_commit()
        .with_context(|| format!("Parent is not a commit: {}", parent))?
        .id();
    let head_oid = repo
        .head()
        .context("Failed to get HEAD")?
        .target()
        .ok_or_else(|| anyhow::anyhow!("HEAD has no target"))?;

    let base = repo
        .merge_base(head_oid, parent_oid)
        .with_context(|| format!("No merge base between HEAD and {}", parent))?;
    Ok(base.to_string())
}

/// Unified diff of the working tree (staged and unstaged) against `rev`.
pub fn diff_since(root: &Path, rev: &str) -> anyhow::Result<String> {
    let repo = Repository::discover(root).context("Failed to open repository")?;

    let tree = repo
        .revparse_single(rev)
        .with_context(|| format!("Failed to resolve revision: {}", rev))?
        .peel_to_tree()
        .context("Failed to get tree for revision")?;

    let mut opts = DiffOptions::new();
    opts.context_lines(3);
    let diff = repo
        .diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))
        .context("Failed to compute diff")?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        // Content lines carry their marker in `origin`; headers include it.
        if matches!(line.origin(), '+' | '-' | ' ') {
            text.push(line.origin());
        }
        text.push_str(&String::from_utf8_lossy(line.content()));
        true
    })
    .context("Failed to render diff")?;

    Ok(text)
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
