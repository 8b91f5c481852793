// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Unified diff parsing.
//!
//! Produces one [`FileDiff`] per file entry, in input order. Lines that are
//! not part of a `--- `/`+++ ` pair or a hunk body (the `diff --git` line,
//! `index`, mode changes, rename and binary markers) are collected into
//! header records that carry no hunks.
//!
//! Within a hunk, context and added lines are numbered from the header's
//! new-range start; removed lines get no new-file line number.

mod hunk;

pub use hunk::HunkHeader;

use tracing::warn;

/// Null device used by unified diffs for created and deleted files.
pub const DEV_NULL: &str = "/dev/null";

/// Kind of a hunk body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Added,
    Removed,
}

/// A single line of a hunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
    pub text: String,
}

/// A contiguous block of changes in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub header: HunkHeader,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// New-file line numbers of the added lines in this hunk.
    pub fn added_lines(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Added)
            .filter_map(|l| l.new_lineno)
    }
}

/// One entry of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileDiff {
    /// True for metadata-only records (no `---`/`+++` pair).
    pub is_header: bool,
    /// Old path as written in the diff, e.g. `a/pkg/foo.py` or `/dev/null`.
    pub old_filename: Option<String>,
    /// New path as written in the diff, e.g. `b/pkg/foo.py` or `/dev/null`.
    pub new_filename: Option<String>,
    pub is_new_file: bool,
    pub is_deleted_file: bool,
    pub hunks: Vec<Hunk>,
    /// Raw metadata lines of a header record.
    pub metadata: Vec<String>,
}

impl FileDiff {
    fn header(metadata: Vec<String>) -> Self {
        Self {
            is_header: true,
            metadata,
            ..Self::default()
        }
    }

    /// True if this header record marks a binary file change.
    pub fn is_binary(&self) -> bool {
        self.metadata
            .iter()
            .any(|l| l.starts_with("Binary files ") || l == "GIT binary patch")
    }
}

/// Parser over the full text of a unified diff.
///
/// Each call to [`DiffParser::files`] starts a fresh pass over the input.
pub struct DiffParser<'a> {
    text: &'a str,
}

impl<'a> DiffParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Iterate over the file entries of the diff.
    pub fn files(&self) -> FileDiffs<'a> {
        FileDiffs {
            lines: self.text.lines().collect(),
            pos: 0,
        }
    }
}

impl<'a> IntoIterator for &DiffParser<'a> {
    type Item = FileDiff;
    type IntoIter = FileDiffs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.files()
    }
}

/// Iterator over [`FileDiff`] records, produced one at a time.
pub struct FileDiffs<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> FileDiffs<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn at_file_header(&self) -> bool {
        match (self.lines.get(self.pos), self.lines.get(self.pos + 1)) {
            (Some(old), Some(new)) => old.starts_with("--- ") && new.starts_with("+++ "),
            _ => false,
        }
    }

    fn parse_file(&mut self) -> FileDiff {
        let old = parse_filename(self.lines[self.pos], "--- ");
        let new = parse_filename(self.lines[self.pos + 1], "+++ ");
        self.pos += 2;

        let mut hunks = Vec::new();
        while let Some(line) = self.peek() {
            if !line.starts_with("@@") {
                break;
            }
            self.pos += 1;
            match HunkHeader::parse(line) {
                Some(header) => hunks.push(self.parse_hunk(header)),
                None => {
                    warn!(header = line, file = %new, "skipping malformed hunk header");
                    self.skip_body();
                }
            }
        }

        FileDiff {
            is_header: false,
            is_new_file: old == DEV_NULL,
            is_deleted_file: new == DEV_NULL,
            old_filename: Some(old),
            new_filename: Some(new),
            hunks,
            metadata: Vec::new(),
        }
    }

    /// Consume a hunk body, using the header lengths to find its end.
    fn parse_hunk(&mut self, header: HunkHeader) -> Hunk {
        let mut old_left = header.old_len;
        let mut new_left = header.new_len;
        let mut old_no = header.old_start;
        let mut new_no = header.new_start;
        let mut lines = Vec::new();

        while let Some(line) = self.peek() {
            // "\ No newline at end of file"
            if line.starts_with('\\') {
                self.pos += 1;
                continue;
            }
            if old_left == 0 && new_left == 0 {
                break;
            }

            let (kind, text) = match line.as_bytes().first() {
                Some(b'+') => (LineKind::Added, &line[1..]),
                Some(b'-') => (LineKind::Removed, &line[1..]),
                Some(b' ') => (LineKind::Context, &line[1..]),
                // Some tools strip the single space of an empty context line.
                None => (LineKind::Context, ""),
                Some(_) => break,
            };

            let (old_lineno, new_lineno) = match kind {
                LineKind::Added if new_left > 0 => {
                    new_left -= 1;
                    new_no += 1;
                    (None, Some(new_no - 1))
                }
                LineKind::Removed if old_left > 0 => {
                    old_left -= 1;
                    old_no += 1;
                    (Some(old_no - 1), None)
                }
                LineKind::Context if old_left > 0 && new_left > 0 => {
                    old_left -= 1;
                    new_left -= 1;
                    old_no += 1;
                    new_no += 1;
                    (Some(old_no - 1), Some(new_no - 1))
                }
                _ => break,
            };

            lines.push(DiffLine {
                kind,
                old_lineno,
                new_lineno,
                text: text.to_string(),
            });
            self.pos += 1;
        }

        Hunk { header, lines }
    }

    /// Skip the body of a hunk whose header could not be parsed.
    fn skip_body(&mut self) {
        while let Some(line) = self.peek() {
            if line.starts_with("@@") || line.starts_with("diff ") || self.at_file_header() {
                break;
            }
            match line.as_bytes().first() {
                None | Some(b'+' | b'-' | b' ' | b'\\') => self.pos += 1,
                Some(_) => break,
            }
        }
    }
}

impl Iterator for FileDiffs<'_> {
    type Item = FileDiff;

    fn next(&mut self) -> Option<FileDiff> {
        let mut metadata = Vec::new();

        while let Some(line) = self.peek() {
            if self.at_file_header() {
                if !metadata.is_empty() {
                    return Some(FileDiff::header(metadata));
                }
                return Some(self.parse_file());
            }
            metadata.push(line.to_string());
            self.pos += 1;
        }

        if metadata.is_empty() {
            None
        } else {
            Some(FileDiff::header(metadata))
        }
    }
}

/// Extract the path from a `--- ` or `+++ ` line.
///
/// Drops a trailing tab-separated timestamp and surrounding quotes.
fn parse_filename(line: &str, marker: &str) -> String {
    let rest = line.strip_prefix(marker).unwrap_or(line);
    let name = rest.split('\t').next().unwrap_or(rest).trim_end();
    let name = name
        .strip_prefix('"')
        .and_then(|n| n.strip_suffix('"'))
        .unwrap_or(name);
    name.to_string()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
