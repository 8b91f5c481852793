// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration parsing and validation.
//!
//! Handles quickunit.toml parsing with version validation and unknown key warnings.

mod parse;
mod suggest;

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::output::OutputFormat;
use parse::{parse_report_config, parse_select_config, warn_unknown_key};

/// Supported config version.
pub const SUPPORTED_VERSION: i64 = 1;

/// Raw top level: known tables are checked by hand, the rest is captured
/// so it can be reported.
#[derive(Deserialize)]
struct FlexibleConfig {
    #[serde(default)]
    version: Option<i64>,

    #[serde(default)]
    select: Option<toml::Value>,

    #[serde(default)]
    report: Option<toml::Value>,

    #[serde(flatten)]
    unknown: std::collections::BTreeMap<String, toml::Value>,
}

/// Full configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Config file version (must be 1).
    pub version: i64,

    /// Test selection settings.
    pub select: SelectConfig,

    /// Coverage report settings.
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            select: SelectConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// What to do when the baseline revision or the diff cannot be obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaselinePolicy {
    /// Fail before any test is gated.
    #[default]
    Abort,
    /// Warn and run every test.
    RunAll,
}

impl BaselinePolicy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "abort" => Some(Self::Abort),
            "run-all" => Some(Self::RunAll),
            _ => None,
        }
    }
}

/// `[select]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    /// Test-directory prefixes.
    pub prefixes: Vec<String>,

    /// Baseline branch.
    pub parent: String,

    /// Globs of recognised source files.
    pub source: Vec<String>,

    /// File-name prefixes stripped when matching test files to changed modules.
    pub test_file_prefixes: Vec<String>,

    pub on_baseline_error: BaselinePolicy,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            prefixes: Self::default_prefixes(),
            parent: Self::default_parent(),
            source: Self::default_source(),
            test_file_prefixes: Self::default_test_file_prefixes(),
            on_baseline_error: BaselinePolicy::default(),
        }
    }
}

impl SelectConfig {
    pub(crate) fn default_prefixes() -> Vec<String> {
        vec!["tests/".to_string()]
    }

    pub(crate) fn default_parent() -> String {
        "master".to_string()
    }

    pub(crate) fn default_source() -> Vec<String> {
        vec!["**/*.py".to_string()]
    }

    pub(crate) fn default_test_file_prefixes() -> Vec<String> {
        vec!["test_".to_string()]
    }
}

/// `[report]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Destination: `-`, `sys://stdout`, `sys://stderr`, or a path.
    pub output: String,

    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: Self::default_output(),
            format: OutputFormat::default(),
        }
    }
}

impl ReportConfig {
    pub(crate) fn default_output() -> String {
        "-".to_string()
    }
}

/// Known top-level keys in the config.
const KNOWN_KEYS: &[&str] = &["version", "select", "report"];

/// Split prefix values on newlines, dropping blanks.
///
/// A single value may carry several prefixes, one per line.
pub fn split_prefixes<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().lines())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Load config from a file, warning about unknown keys.
pub fn load(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse(&content, path)
}

fn check_version(version: i64, path: &Path) -> Result<()> {
    if version != SUPPORTED_VERSION {
        return Err(Error::Config {
            message: format!(
                "unsupported config version {} (supported: {})\n  Upgrade quickunit to use this config.",
                version, SUPPORTED_VERSION
            ),
            path: Some(path.to_path_buf()),
        });
    }
    Ok(())
}

fn toml_error(e: toml::de::Error, path: &Path) -> Error {
    Error::Config {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    }
}

/// Parse config content.
///
/// Unknown keys only warn. Known keys with a value of the wrong type, and an
/// unsupported or missing `version`, are errors.
pub fn parse(content: &str, path: &Path) -> Result<Config> {
    let flexible: FlexibleConfig = toml::from_str(content).map_err(|e| toml_error(e, path))?;
    let version = flexible.version.ok_or_else(|| Error::Config {
        message: "missing required field: version".to_string(),
        path: Some(path.to_path_buf()),
    })?;
    check_version(version, path)?;

    for key in flexible.unknown.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warn_unknown_key(path, key, KNOWN_KEYS);
        }
    }

    let select = parse_select_config(flexible.select.as_ref(), path)?;
    let report = parse_report_config(flexible.report.as_ref(), path)?;

    Ok(Config {
        version,
        select,
        report,
    })
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
