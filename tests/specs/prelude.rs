// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for behavioral specifications.
//!
//! Provides a small DSL for running quickunit against throwaway projects.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub use assert_cmd::prelude::*;
pub use predicates;
pub use predicates::prelude::{Predicate, PredicateBooleanExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Trait for converting into a string predicate.
/// Allows passing `&str` (as contains) or any `Predicate<str>`.
pub trait IntoStrPredicate<P: Predicate<str>> {
    fn into_predicate(self) -> P;
}

impl IntoStrPredicate<predicates::str::ContainsPredicate> for &str {
    fn into_predicate(self) -> predicates::str::ContainsPredicate {
        predicates::str::contains(self)
    }
}

impl<P: Predicate<str>> IntoStrPredicate<P> for P {
    fn into_predicate(self) -> P {
        self
    }
}

/// Returns a Command configured to run the quickunit binary
pub fn quickunit_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("quickunit"));
    cmd.env_remove("QUICKUNIT_CONFIG")
        .env_remove("QUICKUNIT_LOG")
        .env_remove("COLOR");
    cmd
}

/// Builder for `quickunit select`
pub fn select() -> CmdBuilder {
    CmdBuilder::new("select")
}

/// Builder for `quickunit report`
pub fn report() -> CmdBuilder {
    CmdBuilder::new("report")
}

/// Builder for `quickunit changes`
pub fn changes() -> CmdBuilder {
    CmdBuilder::new("changes")
}

/// Fluent command builder for one subcommand
pub struct CmdBuilder {
    subcommand: &'static str,
    dir: Option<PathBuf>,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

#[allow(dead_code)]
impl CmdBuilder {
    fn new(subcommand: &'static str) -> Self {
        Self {
            subcommand,
            dir: None,
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// Run inside `project`, using it as the diff root
    pub fn on(mut self, project: &Project) -> Self {
        self.dir = Some(project.path().to_path_buf());
        self.args.push("--root".to_string());
        self.args.push(project.path().display().to_string());
        self
    }

    /// Set working directory without pinning the root
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn passes(self) -> RunAssert {
        run_exits(self.command(), 0)
    }

    pub fn exits(self, code: i32) -> RunAssert {
        run_exits(self.command(), code)
    }

    fn command(self) -> Command {
        let mut cmd = quickunit_cmd();
        cmd.arg(self.subcommand);
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.envs {
            cmd.env(key, value);
        }

        cmd
    }
}

fn run_exits(mut cmd: Command, code: i32) -> RunAssert {
    let output = cmd.output().expect("command should run");
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit code\nstdout:\n{}\nstderr:\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    RunAssert { output }
}

/// Result of a run for chaining assertions
pub struct RunAssert {
    output: std::process::Output,
}

#[allow(dead_code)]
impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Parse stdout as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.output.stdout).unwrap()
    }

    /// Assert stdout equals expected (with diff on failure)
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stdout matches predicate.
    /// Prefer `stdout_eq` for strict matching.
    pub fn stdout_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            predicate.into_predicate().eval(&stdout),
            "stdout predicate failed:\n{}",
            stdout
        );
        self
    }

    /// Assert stdout does not match predicate.
    pub fn stdout_lacks<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stdout = String::from_utf8_lossy(&self.output.stdout);
        assert!(
            !predicate.into_predicate().eval(&stdout),
            "stdout should NOT match predicate:\n{}",
            stdout
        );
        self
    }

    /// Assert stderr matches predicate.
    pub fn stderr_has<I, P>(self, predicate: I) -> Self
    where
        I: IntoStrPredicate<P>,
        P: Predicate<str>,
    {
        let stderr = String::from_utf8_lossy(&self.output.stderr);
        assert!(
            predicate.into_predicate().eval(&stderr),
            "stderr predicate failed:\n{}",
            stderr
        );
        self
    }
}

// =============================================================================
// PROJECT FIXTURES
// =============================================================================

/// Adds `z = 3` and `return x + y + z` as lines 10 and 11 of `pkg/foo.py`.
pub const FOO_DIFF: &str = "\
diff --git a/pkg/foo.py b/pkg/foo.py
index 1111111..2222222 100644
--- a/pkg/foo.py
+++ b/pkg/foo.py
@@ -8,2 +8,4 @@ def foo():
     x = 1
     y = 2
+    z = 3
+    return x + y + z
";

const FOO_PY: &str = "\
\"\"\"Foo module.\"\"\"

import os

LIMIT = 3


def foo():
    x = 1
    y = 2
    z = 3
    return x + y + z
";

const TEST_FOO_PY: &str = "\
from pkg.foo import foo


class FooTest:
    def test_foo(self):
        assert foo() == 6
";

const TEST_BAR_PY: &str = "\
from pkg.bar import BAR


class BarTest:
    def test_bar(self):
        assert BAR == 1
";

/// Manifest entries for the two tests of [`Project::python`].
pub const MANIFEST: &str = r#"{
  "tests": [
    {"module": "tests.pkg.test_foo", "class": "FooTest", "method": "test_foo",
     "source_file": "tests/pkg/test_foo.py", "lines": {"start": 5, "end": 6}},
    {"module": "tests.pkg.test_bar", "class": "BarTest", "method": "test_bar",
     "source_file": "tests/pkg/test_bar.py", "lines": {"start": 5, "end": 6}}
  ]
}"#;

pub const TEST_FOO: &str = "tests.pkg.test_foo:FooTest.test_foo";
pub const TEST_BAR: &str = "tests.pkg.test_bar:BarTest.test_bar";

/// Temporary project directory
pub struct Project {
    dir: tempfile::TempDir,
}

#[allow(dead_code)]
impl Project {
    /// Create an empty project with no files
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A small python package with two test modules and a manifest.
    ///
    /// Creates:
    /// - `pkg/foo.py`, `pkg/bar.py`
    /// - `tests/pkg/test_foo.py`, `tests/pkg/test_bar.py`
    /// - `manifest.json` listing both tests
    /// - `change.diff` (see [`FOO_DIFF`])
    pub fn python() -> Self {
        let project = Self::empty();
        project.file("pkg/__init__.py", "");
        project.file("pkg/foo.py", FOO_PY);
        project.file("pkg/bar.py", "BAR = 1\n");
        project.file("tests/pkg/test_foo.py", TEST_FOO_PY);
        project.file("tests/pkg/test_bar.py", TEST_BAR_PY);
        project.file("manifest.json", MANIFEST);
        project.file("change.diff", FOO_DIFF);
        project
    }

    /// Get the project path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write quickunit.toml (auto-prefixes with `version = 1` if not present)
    pub fn config(&self, content: &str) {
        let content = if content.contains("version") {
            content.to_string()
        } else {
            format!("version = 1\n{}", content)
        };
        std::fs::write(self.dir.path().join("quickunit.toml"), content).unwrap();
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Write a session: the manifest tests plus `events` (a JSON array).
    pub fn session(&self, events: &str) {
        let manifest: serde_json::Value = serde_json::from_str(MANIFEST).unwrap();
        let events: serde_json::Value = serde_json::from_str(events).unwrap();
        let session = serde_json::json!({
            "tests": manifest["tests"],
            "events": events,
        });
        self.file("session.json", &session.to_string());
    }

    /// Read a file relative to the project
    pub fn read(&self, path: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.dir.path().join(path)).unwrap()
    }
}

// =============================================================================
// GIT TEST HELPERS
// =============================================================================

/// Run git in the project, asserting success
pub fn git(project: &Project, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(project.path())
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Initialize a git repo, commit everything on `master`, and switch to
/// a `feature` branch.
pub fn git_feature_branch(project: &Project) {
    git(project, &["init"]);
    git(project, &["config", "user.email", "test@example.com"]);
    git(project, &["config", "user.name", "Test User"]);
    git(project, &["add", "-A"]);
    git(project, &["commit", "-m", "chore: initial commit"]);
    git(project, &["branch", "-M", "master"]);
    git(project, &["checkout", "-b", "feature"]);
}
