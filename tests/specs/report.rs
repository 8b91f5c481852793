// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `quickunit report`.

use crate::prelude::*;

/// `pkg.foo` is imported by the foo test module; `test_foo` then runs
/// line 10 of the change but not line 11, and `test_bar` runs nothing.
fn recorded_session(project: &Project) {
    project.session(&format!(
        r#"[
  {{"event": "before_import", "module": "tests.pkg.test_foo"}},
  {{"event": "before_import", "module": "pkg.foo"}},
  {{"event": "executed", "file": "pkg/foo.py", "lines": [1, 3, 5, 8]}},
  {{"event": "after_import", "module": "pkg.foo"}},
  {{"event": "after_import", "module": "tests.pkg.test_foo"}},
  {{"event": "start_test", "test": "{TEST_FOO}"}},
  {{"event": "executed", "file": "pkg/foo.py", "lines": [9, 10]}},
  {{"event": "stop_test", "test": "{TEST_FOO}"}},
  {{"event": "start_test", "test": "{TEST_BAR}"}},
  {{"event": "stop_test", "test": "{TEST_BAR}"}}
]"#
    ));
}

fn expected_report() -> serde_json::Value {
    serde_json::json!({
        "stats": {"covered": 1, "total": 2},
        "tests": {
            TEST_FOO: {"pkg/foo.py": {"10": 1, "11": 0}},
        },
    })
}

#[test]
fn report_json_to_stdout() {
    let project = Project::python();
    recorded_session(&project);

    let result = report()
        .on(&project)
        .args(&[
            "--session",
            "session.json",
            "--diff",
            "change.diff",
            "-o",
            "sys://stdout",
        ])
        .passes();

    assert_eq!(result.json(), expected_report());
}

#[test]
fn report_text_summary_and_missing_lines() {
    let project = Project::python();
    recorded_session(&project);

    report()
        .on(&project)
        .args(&[
            "--session",
            "session.json",
            "--diff",
            "change.diff",
            "-o",
            "sys://stdout",
            "--format",
            "text",
        ])
        .env("NO_COLOR", "1")
        .passes()
        .stdout_eq(
            "Coverage against diff is 50.00% (1 / 2 lines)\n\
             Filename    Missing Lines\n\
             pkg/foo.py  11\n",
        );
}

#[test]
fn report_to_file_creates_parent_directories() {
    let project = Project::python();
    recorded_session(&project);

    report()
        .on(&project)
        .args(&[
            "--session",
            "session.json",
            "--diff",
            "change.diff",
            "-o",
            "out/coverage/report.json",
        ])
        .passes()
        .stdout_eq("");

    let written: serde_json::Value =
        serde_json::from_str(&project.read("out/coverage/report.json")).unwrap();
    assert_eq!(written, expected_report());
}

#[test]
fn report_default_destination_writes_nothing() {
    let project = Project::python();
    recorded_session(&project);

    report()
        .on(&project)
        .args(&["--session", "session.json", "--diff", "change.diff"])
        .passes()
        .stdout_eq("");
}

#[test]
fn report_destination_from_config() {
    let project = Project::python();
    recorded_session(&project);
    project.config("[report]\noutput = \"sys://stdout\"\nformat = \"text\"\n");

    report()
        .on(&project)
        .args(&["--session", "session.json", "--diff", "change.diff"])
        .passes()
        .stdout_has("Coverage against diff is 50.00% (1 / 2 lines)");
}

#[test]
fn report_with_empty_diff_is_empty() {
    let project = Project::python();
    recorded_session(&project);
    project.file("empty.diff", "");

    report()
        .on(&project)
        .args(&[
            "--session",
            "session.json",
            "--diff",
            "empty.diff",
            "-o",
            "sys://stdout",
        ])
        .passes()
        .stdout_eq(
            "{\n  \"stats\": {\n    \"covered\": 0,\n    \"total\": 0\n  },\n  \"tests\": {}\n}\n",
        );
}

#[test]
fn report_counts_import_time_lines_for_importing_tests() {
    let project = Project::python();
    project.session(&format!(
        r#"[
  {{"event": "before_import", "module": "tests.pkg.test_foo"}},
  {{"event": "before_import", "module": "pkg.foo"}},
  {{"event": "executed", "file": "pkg/foo.py", "lines": [11]}},
  {{"event": "after_import", "module": "pkg.foo"}},
  {{"event": "after_import", "module": "tests.pkg.test_foo"}},
  {{"event": "start_test", "test": "{TEST_FOO}"}},
  {{"event": "executed", "file": "pkg/foo.py", "lines": [10]}},
  {{"event": "stop_test", "test": "{TEST_FOO}"}}
]"#
    ));

    let result = report()
        .on(&project)
        .args(&[
            "--session",
            "session.json",
            "--diff",
            "change.diff",
            "-o",
            "sys://stdout",
        ])
        .passes();

    assert_eq!(
        result.json(),
        serde_json::json!({
            "stats": {"covered": 2, "total": 2},
            "tests": {TEST_FOO: {"pkg/foo.py": {"10": 1, "11": 1}}},
        })
    );
}

#[test]
fn report_unknown_stream_is_argument_error() {
    let project = Project::python();
    recorded_session(&project);

    report()
        .on(&project)
        .args(&[
            "--session",
            "session.json",
            "--diff",
            "change.diff",
            "-o",
            "sys://nowhere",
        ])
        .exits(2)
        .stderr_has("argument error");
}

#[test]
fn report_unknown_test_in_session_fails() {
    let project = Project::python();
    project.session(r#"[{"event": "start_test", "test": "tests.pkg.test_baz:BazTest.test_baz"}]"#);

    report()
        .on(&project)
        .args(&["--session", "session.json", "--diff", "change.diff"])
        .exits(3)
        .stderr_has("unknown test");
}

#[test]
fn report_unbalanced_session_fails() {
    let project = Project::python();
    project.session(&format!(
        r#"[{{"event": "start_test", "test": "{TEST_FOO}"}}]"#
    ));

    report()
        .on(&project)
        .args(&["--session", "session.json", "--diff", "change.diff"])
        .exits(3)
        .stderr_has("still open");
}

#[test]
fn report_malformed_session_fails() {
    let project = Project::python();
    project.file("session.json", "{ not json");

    report()
        .on(&project)
        .args(&["--session", "session.json", "--diff", "change.diff"])
        .exits(3)
        .stderr_has("session error");
}
