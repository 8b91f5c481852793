// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diff-driven test selection and diff coverage.

pub mod capture;
pub mod changes;
pub mod cli;
pub mod color;
pub mod config;
pub mod correlate;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod git;
pub mod identity;
pub mod output;
pub mod plan;
pub mod report;
pub mod select;
pub mod session;

pub use capture::{Capture, CaptureState, LineTracer, RecordingTracer};
pub use changes::{ChangeSet, SourceFilter};
pub use cli::{Cli, Command, OutputFormat, ReportArgs, SelectArgs};
pub use config::{BaselinePolicy, Config};
pub use correlate::{CoverageSample, Correlator, ImportTimeCoverage};
pub use diff::{DiffParser, FileDiff};
pub use error::{Error, ExitCode, Result};
pub use identity::{TestIdentity, TestManifest, TestRegistry};
pub use plan::{Plan, PlanOptions};
pub use report::{Report, Stats};
pub use select::Selector;
pub use session::{Event, Session};

#[cfg(test)]
pub mod test_utils;
