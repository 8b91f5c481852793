// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `quickunit select`.

use crate::prelude::*;

#[test]
fn select_runs_tests_of_changed_module() {
    let project = Project::python();

    select()
        .on(&project)
        .args(&["--tests", "manifest.json", "--diff", "change.diff"])
        .passes()
        .stdout_eq(&format!("{TEST_FOO}\n"));
}

#[test]
fn select_json_prints_array() {
    let project = Project::python();

    let result = select()
        .on(&project)
        .args(&["--tests", "manifest.json", "--diff", "change.diff", "--json"])
        .passes();

    assert_eq!(result.json(), serde_json::json!([TEST_FOO]));
}

#[test]
fn select_runs_test_whose_source_changed() {
    let project = Project::python();
    project.file(
        "bar.diff",
        "\
--- a/tests/pkg/test_bar.py
+++ b/tests/pkg/test_bar.py
@@ -5,2 +5,2 @@ class BarTest:
     def test_bar(self):
-        assert BAR == 2
+        assert BAR == 1
",
    );

    select()
        .on(&project)
        .args(&["--tests", "manifest.json", "--diff", "bar.diff"])
        .passes()
        .stdout_eq(&format!("{TEST_BAR}\n"));
}

#[test]
fn select_with_empty_diff_selects_nothing() {
    let project = Project::python();
    project.file("empty.diff", "");

    select()
        .on(&project)
        .args(&["--tests", "manifest.json", "--diff", "empty.diff"])
        .passes()
        .stdout_eq("");
}

#[test]
fn select_reads_diff_from_stdin() {
    let project = Project::python();

    let mut cmd = assert_cmd::Command::from_std(quickunit_cmd());
    cmd.current_dir(project.path())
        .args(["select", "--tests", "manifest.json", "--diff", "-"])
        .arg("--root")
        .arg(project.path())
        .write_stdin(FOO_DIFF)
        .assert()
        .success()
        .stdout(format!("{TEST_FOO}\n"));
}

#[test]
fn select_ignores_changes_outside_source_globs() {
    let project = Project::python();
    project.file(
        "docs.diff",
        "\
--- a/README.md
+++ b/README.md
@@ -1 +1,2 @@
 # pkg
+More words.
",
    );

    select()
        .on(&project)
        .args(&["--tests", "manifest.json", "--diff", "docs.diff"])
        .passes()
        .stdout_eq("");
}

#[test]
fn select_prefix_flag_overrides_config() {
    let project = Project::python();
    project.config("[select]\nprefixes = [\"other/\"]\n");

    select()
        .on(&project)
        .args(&[
            "--tests",
            "manifest.json",
            "--diff",
            "change.diff",
            "--prefix",
            "tests/",
        ])
        .passes()
        .stdout_eq(&format!("{TEST_FOO}\n"));
}

#[test]
fn select_without_matching_prefix_runs_nothing() {
    let project = Project::python();
    project.config("[select]\nprefixes = [\"other/\"]\n");

    select()
        .on(&project)
        .args(&["--tests", "manifest.json", "--diff", "change.diff"])
        .passes()
        .stdout_eq("");
}

#[test]
fn select_missing_manifest_is_io_error() {
    let project = Project::python();

    select()
        .on(&project)
        .args(&["--tests", "nope.json", "--diff", "change.diff"])
        .exits(3)
        .stderr_has("nope.json");
}

#[test]
fn select_without_baseline_aborts_by_default() {
    let project = Project::python();

    select()
        .on(&project)
        .args(&["--tests", "manifest.json"])
        .exits(3)
        .stderr_has("baseline error");
}

#[test]
fn select_without_baseline_can_run_everything() {
    let project = Project::python();
    project.config("[select]\non_baseline_error = \"run-all\"\n");

    select()
        .on(&project)
        .args(&["--tests", "manifest.json"])
        .passes()
        .stdout_eq(&format!("{TEST_BAR}\n{TEST_FOO}\n"));
}
