// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Text output formatter.
//!
//! ```text
//! Coverage against diff is 50.00% (2 / 4 lines)
//! Filename      Missing Lines
//! pkg/foo.py    11, 14-16
//! ```
//!
//! The table is omitted when every changed line is covered.

use std::io::Write;
use termcolor::{ColorSpec, WriteColor};

use crate::color::scheme;
use crate::report::{Report, Stats, format_ranges};

const FILENAME_HEADING: &str = "Filename";
const MISSING_HEADING: &str = "Missing Lines";

/// Text output formatter with color support.
pub struct TextFormatter<W: WriteColor> {
    out: W,
}

impl<W: WriteColor> TextFormatter<W> {
    /// Create a new text formatter.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the summary line and the missing-lines table.
    pub fn write(&mut self, report: &Report) -> std::io::Result<()> {
        self.write_summary(&report.stats)?;

        let missing = report.missing_lines();
        if missing.is_empty() {
            return Ok(());
        }

        let width = missing
            .keys()
            .map(String::len)
            .chain(std::iter::once(FILENAME_HEADING.len()))
            .max()
            .unwrap_or(FILENAME_HEADING.len());

        self.out.set_color(&scheme::heading())?;
        write!(self.out, "{:<width$}  {}", FILENAME_HEADING, MISSING_HEADING)?;
        self.out.reset()?;
        writeln!(self.out)?;

        for (file, lines) in &missing {
            self.out.set_color(&scheme::path())?;
            write!(self.out, "{:<width$}", file)?;
            self.out.reset()?;
            write!(self.out, "  ")?;
            self.out.set_color(&scheme::line_number())?;
            write!(self.out, "{}", format_ranges(lines))?;
            self.out.reset()?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn write_summary(&mut self, stats: &Stats) -> std::io::Result<()> {
        write!(self.out, "Coverage against diff is ")?;
        self.out.set_color(&percent_color(stats))?;
        write!(self.out, "{:.2}%", stats.percent())?;
        self.out.reset()?;
        writeln!(self.out, " ({} / {} lines)", stats.covered, stats.total)
    }
}

fn percent_color(stats: &Stats) -> ColorSpec {
    if stats.covered == stats.total {
        scheme::pass()
    } else if stats.covered == 0 {
        scheme::fail()
    } else {
        scheme::warn()
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
