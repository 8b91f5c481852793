// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Locating `quickunit.toml`.
//!
//! An explicit `-C`/`QUICKUNIT_CONFIG` path must exist. Otherwise the nearest
//! `quickunit.toml` between the working directory and the repository root
//! wins, and without one the built-in defaults apply.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{self, Config};
use crate::error::{Error, Result};

/// Config file name.
pub const CONFIG_FILE: &str = "quickunit.toml";

/// Where the effective configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Discovered(PathBuf),
    Defaults,
}

impl ConfigSource {
    /// Pick the config source for a run started in `cwd`.
    pub fn locate(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::Config {
                    message: format!("config file not found: {}", path.display()),
                    path: Some(path.to_path_buf()),
                });
            }
            return Ok(Self::Explicit(path.to_path_buf()));
        }

        for dir in cwd.ancestors() {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Ok(Self::Discovered(candidate));
            }
            // The repository root bounds the search.
            if dir.join(".git").exists() {
                break;
            }
        }
        Ok(Self::Defaults)
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Discovered(path) => Some(path),
            Self::Defaults => None,
        }
    }

    /// Read the config, or the defaults when there is no file.
    pub fn load(&self) -> Result<Config> {
        match self.path() {
            Some(path) => config::load(path),
            None => Ok(Config::default()),
        }
    }
}

/// Locate and load the config for a run started in `cwd`.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let source = ConfigSource::locate(explicit, cwd)?;
    debug!(source = ?source, "config source");
    source.load()
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
