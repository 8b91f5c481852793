// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for diffing against the merge base with the parent branch.

use crate::prelude::*;

/// Feature branch with line 11 of `pkg/foo.py` added in the working tree.
fn feature_project() -> Project {
    let project = Project::python();
    project.file(
        "pkg/foo.py",
        "\"\"\"Foo module.\"\"\"\n\nimport os\n\nLIMIT = 3\n\n\ndef foo():\n    x = 1\n    y = 2\n",
    );
    git_feature_branch(&project);
    project.file(
        "pkg/foo.py",
        "\"\"\"Foo module.\"\"\"\n\nimport os\n\nLIMIT = 3\n\n\ndef foo():\n    x = 1\n    y = 2\n    return x + y\n",
    );
    project
}

#[test]
fn changes_against_parent_branch() {
    let project = feature_project();

    changes()
        .pwd(project.path())
        .passes()
        .stdout_eq("pkg/foo.py: 11\npending: tests/pkg/foo\n");
}

#[test]
fn select_against_parent_branch() {
    let project = feature_project();

    select()
        .pwd(project.path())
        .args(&["--tests", "manifest.json"])
        .passes()
        .stdout_eq(&format!("{TEST_FOO}\n"));
}

#[test]
fn committed_changes_count_against_merge_base() {
    let project = feature_project();
    git(&project, &["add", "-A"]);
    git(&project, &["commit", "-m", "feat: return the sum"]);

    changes()
        .pwd(project.path())
        .passes()
        .stdout_eq("pkg/foo.py: 11\npending: tests/pkg/foo\n");
}

#[test]
fn unknown_parent_is_baseline_error() {
    let project = feature_project();

    changes()
        .pwd(project.path())
        .args(&["--parent", "no-such-branch"])
        .exits(3)
        .stderr_has("baseline error");
}

#[test]
fn unknown_parent_can_run_everything() {
    let project = feature_project();
    project.config("[select]\nparent = \"no-such-branch\"\non_baseline_error = \"run-all\"\n");

    select()
        .pwd(project.path())
        .args(&["--tests", "manifest.json"])
        .passes()
        .stdout_eq(&format!("{TEST_BAR}\n{TEST_FOO}\n"));
}
