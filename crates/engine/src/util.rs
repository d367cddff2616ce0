//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! text cleanup so names and codes are compared the same way everywhere.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Trims and collapses inner whitespace. Returns `None` for blank input.
pub(crate) fn normalize_display(input: &str) -> Option<String> {
    let mut out = String::new();
    for token in input.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    if out.is_empty() { None } else { Some(out) }
}

/// Comparison key: lowercase, accents stripped, punctuation folded to single
/// spaces. `"  Carbón "` and `"carbon"` share the key `"carbon"`.
pub(crate) fn normalize_key(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::new();
    let mut prev_space = false;
    for ch in trimmed.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    let normalized = out.trim();
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_string())
    }
}
