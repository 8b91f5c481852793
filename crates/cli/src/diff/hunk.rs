// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hunk header grammar: `@@ -<old_start>[,<old_len>] +<new_start>[,<new_len>] @@`.

use std::sync::OnceLock;

use regex::Regex;

const HUNK_HEADER: &str = r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@";

fn hunk_header_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(HUNK_HEADER).ok()).as_ref()
}

/// Parsed line ranges of a hunk header.
///
/// An omitted length means a single line, as in `@@ -3 +3 @@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_len: u32,
    pub new_start: u32,
    pub new_len: u32,
}

impl HunkHeader {
    /// Parse a hunk header line. Returns `None` when the line does not match
    /// the unified-diff grammar or a range runs past `u32::MAX`.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = hunk_header_regex()?.captures(line)?;
        let number = |idx: usize| -> Option<u32> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse().ok(),
                None => Some(1),
            }
        };

        let header = Self {
            old_start: number(1)?,
            old_len: number(2)?,
            new_start: number(3)?,
            new_len: number(4)?,
        };
        header.old_start.checked_add(header.old_len)?;
        header.new_start.checked_add(header.new_len)?;
        Some(header)
    }
}

#[cfg(test)]
#[path = "hunk_tests.rs"]
mod tests;
