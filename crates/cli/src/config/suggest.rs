// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key name suggestions for config validation.

/// Suggest a known key for a typo.
pub fn suggest_key(unknown: &str, known: &[&'static str]) -> Option<&'static str> {
    // Empty strings can't be typos
    if unknown.is_empty() {
        return None;
    }

    // Common variations
    let alias = match unknown {
        "prefix" | "test_prefix" | "test_prefixes" | "test_dirs" => Some("prefixes"),
        "base" | "branch" | "baseline" | "parent_branch" => Some("parent"),
        "sources" | "include" | "src" => Some("source"),
        "file_prefixes" | "test_file_prefix" => Some("test_file_prefixes"),
        "on_error" | "baseline_error" | "on_baseline_failure" => Some("on_baseline_error"),
        "out" | "destination" | "dest" => Some("output"),
        "fmt" | "output_format" => Some("format"),
        _ => None,
    };
    if let Some(alias) = alias
        && known.contains(&alias)
    {
        return Some(alias);
    }

    // Try prefix matching (require at least 2 chars to avoid false positives)
    if unknown.len() >= 2 {
        for &name in known {
            if name.starts_with(unknown) || unknown.starts_with(name) {
                return Some(name);
            }
        }
    }

    None
}

#[cfg(test)]
#[path = "suggest_tests.rs"]
mod tests;
