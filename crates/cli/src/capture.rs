// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line capture capability.
//!
//! The instrumentation that records executed lines is external; it is reached
//! through the [`LineTracer`] trait. [`Capture`] wraps a tracer and enforces
//! the bracket discipline `idle -> capturing -> idle`: starting while
//! capturing, stopping while idle, and erasing or reading while capturing are
//! errors. Erasing while idle is always allowed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// External line-execution tracer.
pub trait LineTracer {
    /// Begin recording executed lines.
    fn start(&mut self);

    /// Stop recording. Recorded lines stay readable until erased.
    fn stop(&mut self);

    /// Discard everything recorded so far.
    fn erase(&mut self);

    /// Lines executed in `file` since the last erase, or `None` if the file
    /// was not measured.
    fn executed_lines(&self, file: &Path) -> Option<BTreeSet<u32>>;
}

/// Capture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Capturing,
}

/// A tracer guarded by the capture state machine.
pub struct Capture<T> {
    tracer: T,
    state: CaptureState,
}

impl<T: LineTracer> Capture<T> {
    pub fn new(tracer: T) -> Self {
        Self {
            tracer,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn start(&mut self) -> Result<()> {
        if self.state == CaptureState::Capturing {
            return Err(Error::Capture(
                "start while a capture is already active".to_string(),
            ));
        }
        self.tracer.start();
        self.state = CaptureState::Capturing;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        if self.state == CaptureState::Idle {
            return Err(Error::Capture("stop without a matching start".to_string()));
        }
        self.tracer.stop();
        self.state = CaptureState::Idle;
        Ok(())
    }

    /// Clear recorded lines. A no-op on an already empty capture.
    pub fn erase(&mut self) -> Result<()> {
        if self.state == CaptureState::Capturing {
            return Err(Error::Capture("erase while capturing".to_string()));
        }
        self.tracer.erase();
        Ok(())
    }

    /// Lines executed in `file` during the last bracket.
    pub fn executed_lines(&self, file: &Path) -> Result<Option<BTreeSet<u32>>> {
        if self.state == CaptureState::Capturing {
            return Err(Error::Capture(
                "executed lines read while capturing".to_string(),
            ));
        }
        Ok(self.tracer.executed_lines(file))
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut T {
        &mut self.tracer
    }

    pub fn into_inner(self) -> T {
        self.tracer
    }
}

/// Tracer fed with executed lines by the caller.
///
/// Lines reported while stopped are dropped, the same way a live tracer only
/// sees code that runs while it is started.
#[derive(Debug, Default)]
pub struct RecordingTracer {
    active: bool,
    executed: BTreeMap<PathBuf, BTreeSet<u32>>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report that `lines` of `file` executed.
    pub fn hit(&mut self, file: impl Into<PathBuf>, lines: impl IntoIterator<Item = u32>) {
        if !self.active {
            return;
        }
        self.executed
            .entry(file.into())
            .or_default()
            .extend(lines);
    }
}

impl LineTracer for RecordingTracer {
    fn start(&mut self) {
        self.active = true;
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn erase(&mut self) {
        self.executed.clear();
    }

    fn executed_lines(&self, file: &Path) -> Option<BTreeSet<u32>> {
        self.executed.get(file).cloned()
    }
}

#[cfg(test)]
#[path = "capture_tests.rs"]
mod tests;
