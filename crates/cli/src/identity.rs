// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test identities and the registry that resolves collected tests to them.
//!
//! A test may be collected under a different module than the one that
//! defines it (for example when a test class is imported into another test
//! module). The host registers each test under its defining module and
//! declares the collected names as aliases, so every later lookup yields the
//! same canonical [`TestIdentity`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive source line range of a test method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Where a test is actually defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestIdentity {
    /// Dotted module name, e.g. `tests.pkg.test_foo`.
    pub module: String,
    /// Defining class, absent for plain test functions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub method: String,
    /// File defining the test, absolute or relative to the project root.
    pub source_file: PathBuf,
    /// Lines spanned by the test method's source.
    pub lines: LineRange,
}

impl TestIdentity {
    /// Canonical name: `module:Class.method`, or `module:method` without a class.
    pub fn test_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "{}:{}.{}", self.module, class, self.method),
            None => write!(f, "{}:{}", self.module, self.method),
        }
    }
}

/// Serialized form of a registry: identities plus collected-name aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestManifest {
    #[serde(default)]
    pub tests: Vec<TestIdentity>,
    /// Collected name -> canonical name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl TestManifest {
    /// Load a manifest from a JSON file. Extra top-level keys are ignored, so a
    /// recorded session file works as well.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Session(format!("{}: {}", path.display(), e)))
    }
}

/// Resolves collected test names to canonical identities.
#[derive(Debug, Clone, Default)]
pub struct TestRegistry {
    tests: BTreeMap<String, TestIdentity>,
    aliases: BTreeMap<String, String>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a manifest, rejecting aliases to unknown tests.
    pub fn from_manifest(manifest: TestManifest) -> Result<Self> {
        let mut registry = Self::new();
        for test in manifest.tests {
            registry.register(test);
        }
        for (collected, canonical) in manifest.aliases {
            registry.alias(&collected, &canonical)?;
        }
        Ok(registry)
    }

    /// Register a test under its canonical name.
    pub fn register(&mut self, identity: TestIdentity) {
        self.tests.insert(identity.test_name(), identity);
    }

    /// Declare that `collected` refers to the registered test `canonical`.
    pub fn alias(&mut self, collected: &str, canonical: &str) -> Result<()> {
        if !self.tests.contains_key(canonical) {
            return Err(Error::Session(format!(
                "alias {collected} points at unknown test {canonical}"
            )));
        }
        self.aliases
            .insert(collected.to_string(), canonical.to_string());
        Ok(())
    }

    /// Look up a test by canonical or collected name.
    pub fn resolve(&self, name: &str) -> Option<&TestIdentity> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.tests.get(canonical)
    }

    /// All registered tests, ordered by canonical name.
    pub fn tests(&self) -> impl Iterator<Item = &TestIdentity> {
        self.tests.values()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
