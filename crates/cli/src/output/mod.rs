// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report destinations and formatters.
//!
//! Destinations:
//! - `-` or empty: no report is emitted
//! - `sys://stdout`, `sys://stderr`: a standard stream
//! - anything else: a file path, parent directories created first

pub mod json;
pub mod text;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use termcolor::{NoColor, StandardStream, WriteColor};
use tracing::debug;

use crate::color::{Stream, resolve_color};
use crate::error::{Error, Result};
use crate::report::Report;

pub use json::JsonFormatter;
pub use text::TextFormatter;

const STREAM_SCHEME: &str = "sys://";

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Where a report goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    Suppressed,
    Stdout,
    Stderr,
    File(PathBuf),
}

impl FromStr for ReportDestination {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "" | "-" => Ok(Self::Suppressed),
            "sys://stdout" => Ok(Self::Stdout),
            "sys://stderr" => Ok(Self::Stderr),
            other if other.starts_with(STREAM_SCHEME) => Err(Error::Argument(format!(
                "unknown stream {other:?} (expected sys://stdout or sys://stderr)"
            ))),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

impl ReportDestination {
    /// Write `report` in `format`. File output is rendered in full before the
    /// file is created, so a failure never leaves a partial report behind.
    pub fn write(&self, report: &Report, format: OutputFormat) -> Result<()> {
        match self {
            Self::Suppressed => {
                debug!("report output suppressed");
                Ok(())
            }
            Self::Stdout => {
                let mut out = StandardStream::stdout(resolve_color(Stream::Stdout));
                render(&mut out, report, format).map_err(|source| stream_error("<stdout>", source))
            }
            Self::Stderr => {
                let mut out = StandardStream::stderr(resolve_color(Stream::Stderr));
                render(&mut out, report, format).map_err(|source| stream_error("<stderr>", source))
            }
            Self::File(path) => write_file(path, report, format),
        }
    }
}

fn write_file(path: &Path, report: &Report, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut buffer = NoColor::new(Vec::new());
    render(&mut buffer, report, format).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, buffer.into_inner()).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "report written");
    Ok(())
}

fn render<W: WriteColor>(out: &mut W, report: &Report, format: OutputFormat) -> std::io::Result<()> {
    match format {
        OutputFormat::Json => JsonFormatter::new(&mut *out).write(report)?,
        OutputFormat::Text => TextFormatter::new(&mut *out).write(report)?,
    }
    out.flush()
}

fn stream_error(name: &str, source: std::io::Error) -> Error {
    Error::Io {
        path: PathBuf::from(name),
        source,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
