// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parse helper functions for configuration.

use std::path::Path;

use super::suggest::suggest_key;
use super::{BaselinePolicy, ReportConfig, SelectConfig, split_prefixes};
use crate::error::{Error, Result};
use crate::output::OutputFormat;

const KNOWN_SELECT_KEYS: &[&str] = &[
    "prefixes",
    "parent",
    "source",
    "test_file_prefixes",
    "on_baseline_error",
];

const KNOWN_REPORT_KEYS: &[&str] = &["output", "format"];

type Table = toml::map::Map<String, toml::Value>;

fn invalid_value(path: &Path, key: &str, value: &str, expected: &str) -> Error {
    Error::Config {
        message: format!("invalid value {value:?} for {key} (expected {expected})"),
        path: Some(path.to_path_buf()),
    }
}

fn wrong_type(path: &Path, key: &str, value: &toml::Value, expected: &str) -> Error {
    Error::Config {
        message: format!("{key} must be {expected}, found {}", value.type_str()),
        path: Some(path.to_path_buf()),
    }
}

/// A top-level table such as `[select]`; absent means defaults.
fn table<'a>(value: Option<&'a toml::Value>, key: &str, path: &Path) -> Result<Option<&'a Table>> {
    match value {
        None => Ok(None),
        Some(toml::Value::Table(t)) => Ok(Some(t)),
        Some(other) => Err(wrong_type(path, key, other, "a table")),
    }
}

/// A string value, or `None` when the key is absent.
fn string<'a>(t: &'a Table, table: &str, key: &str, path: &Path) -> Result<Option<&'a str>> {
    match t.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(wrong_type(path, &format!("{table}.{key}"), other, "a string")),
    }
}

/// An array of strings, or `None` when the key is absent.
fn string_array(t: &Table, table: &str, key: &str, path: &Path) -> Result<Option<Vec<String>>> {
    let Some(value) = t.get(key) else {
        return Ok(None);
    };
    let expected = "an array of strings";
    let full_key = format!("{table}.{key}");
    let toml::Value::Array(items) = value else {
        return Err(wrong_type(path, &full_key, value, expected));
    };
    items
        .iter()
        .map(|item| match item {
            toml::Value::String(s) => Ok(s.clone()),
            other => Err(wrong_type(path, &full_key, other, expected)),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Warn about an unrecognized key, suggesting a known one when close.
pub(super) fn warn_unknown_key(path: &Path, key: &str, known: &[&'static str]) {
    let field = key.rsplit('.').next().unwrap_or(key);
    match suggest_key(field, known) {
        Some(suggested) => eprintln!(
            "quickunit: warning: {}: unrecognized field `{}` (ignored). Did you mean `{}`?",
            path.display(),
            key,
            suggested
        ),
        None => eprintln!(
            "quickunit: warning: {}: unrecognized field `{}` (ignored)",
            path.display(),
            key
        ),
    }
}

/// Parse the `[select]` table.
pub(super) fn parse_select_config(
    value: Option<&toml::Value>,
    path: &Path,
) -> Result<SelectConfig> {
    let Some(t) = table(value, "select", path)? else {
        return Ok(SelectConfig::default());
    };

    for key in t.keys() {
        if !KNOWN_SELECT_KEYS.contains(&key.as_str()) {
            warn_unknown_key(path, &format!("select.{}", key), KNOWN_SELECT_KEYS);
        }
    }

    // A single string is accepted and split on newlines.
    let prefixes = match t.get("prefixes") {
        Some(toml::Value::String(s)) => split_prefixes(&[s.as_str()]),
        _ => split_prefixes(
            &string_array(t, "select", "prefixes", path)?
                .unwrap_or_else(SelectConfig::default_prefixes),
        ),
    };

    let on_baseline_error = match string(t, "select", "on_baseline_error", path)? {
        Some(s) => BaselinePolicy::parse(s).ok_or_else(|| {
            invalid_value(path, "select.on_baseline_error", s, "\"abort\" or \"run-all\"")
        })?,
        None => BaselinePolicy::default(),
    };

    Ok(SelectConfig {
        prefixes,
        parent: string(t, "select", "parent", path)?
            .map(String::from)
            .unwrap_or_else(SelectConfig::default_parent),
        source: string_array(t, "select", "source", path)?
            .unwrap_or_else(SelectConfig::default_source),
        test_file_prefixes: string_array(t, "select", "test_file_prefixes", path)?
            .unwrap_or_else(SelectConfig::default_test_file_prefixes),
        on_baseline_error,
    })
}

/// Parse the `[report]` table.
pub(super) fn parse_report_config(
    value: Option<&toml::Value>,
    path: &Path,
) -> Result<ReportConfig> {
    let Some(t) = table(value, "report", path)? else {
        return Ok(ReportConfig::default());
    };

    for key in t.keys() {
        if !KNOWN_REPORT_KEYS.contains(&key.as_str()) {
            warn_unknown_key(path, &format!("report.{}", key), KNOWN_REPORT_KEYS);
        }
    }

    let format = match string(t, "report", "format", path)? {
        Some("json") => OutputFormat::Json,
        Some("text") => OutputFormat::Text,
        Some(other) => {
            return Err(invalid_value(
                path,
                "report.format",
                other,
                "\"json\" or \"text\"",
            ));
        }
        None => OutputFormat::default(),
    };

    Ok(ReportConfig {
        output: string(t, "report", "output", path)?
            .map(String::from)
            .unwrap_or_else(ReportConfig::default_output),
        format,
    })
}
