// ABOUTME: Free-text sanitizer applied to names and notes before storage
// ABOUTME: Truncates, HTML-escapes, strips null bytes and neutralizes SQL keyword sequences
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Text sanitization
//!
//! Defense in depth only: every statement the service issues is parameterized.
//! The sanitizer exists so that stored text is inert if it is ever rendered or
//! copied into another system.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::fields::BLOCKED_MARKER;

/// Case-insensitive SQL keyword sequences replaced by [`BLOCKED_MARKER`]
static BLOCKED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bdrop\s+table\b",
        r"(?i)\bdelete\s+from\b",
        r"(?i)\binsert\s+into\b",
        r"(?i)\bupdate\s+.*\s+set\b",
        r"(?i)\bunion\s+select\b",
        r"(?i)\bselect\s+.*\s+from\b",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Statement separators and comment openers removed outright
const STRIPPED_SEQUENCES: [&str; 4] = [";", "--", "/*", "*/"];

/// Sanitize free text for storage
///
/// Steps, in order: truncate to `max_chars` characters, HTML-escape, drop null
/// bytes, replace blocked SQL keyword sequences, remove `;`, `--`, `/*`, `*/`,
/// then trim surrounding whitespace.
///
/// # Examples
/// ```
/// # use workout_tracker::validation::sanitize_text;
/// let cleaned = sanitize_text("'; DROP TABLE users; --", 1000);
/// assert!(!cleaned.contains(';'));
/// assert!(!cleaned.contains("--"));
/// assert!(!cleaned.to_lowercase().contains("drop table"));
/// assert!(cleaned.contains("[BLOCKED]"));
/// ```
#[must_use]
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    if input.is_empty() {
        return String::new();
    }

    let truncated: String = input.chars().take(max_chars).collect();
    let mut sanitized = html_escape::encode_quoted_attribute(&truncated)
        .replace('\0', "");

    for pattern in BLOCKED_PATTERNS.iter() {
        sanitized = pattern
            .replace_all(&sanitized, BLOCKED_MARKER)
            .into_owned();
    }

    for sequence in STRIPPED_SEQUENCES {
        sanitized = sanitized.replace(sequence, "");
    }

    sanitized.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injection_payload_is_neutralized() {
        let cleaned = sanitize_text("'; DROP TABLE users; --", 1000);
        assert!(!cleaned.contains(';'));
        assert!(!cleaned.contains("--"));
        assert!(!cleaned.to_lowercase().contains("drop table"));
        assert!(cleaned.contains(BLOCKED_MARKER));
    }

    #[test]
    fn test_every_keyword_sequence_is_blocked() {
        for input in [
            "please Delete   From logs",
            "INSERT INTO x",
            "update users set admin",
            "1 UNION SELECT password",
            "select name from users",
        ] {
            let cleaned = sanitize_text(input, 1000);
            assert!(cleaned.contains(BLOCKED_MARKER), "not blocked: {input}");
        }
    }

    #[test]
    fn test_html_is_escaped() {
        let cleaned = sanitize_text("<script>alert(1)</script>", 1000);
        assert!(!cleaned.contains('<'));
        assert!(cleaned.contains("&lt"));
    }

    #[test]
    fn test_comment_markers_and_null_bytes_removed() {
        assert_eq!(sanitize_text("a/*b*/c\0d", 1000), "abcd");
    }

    #[test]
    fn test_truncates_by_characters() {
        let cleaned = sanitize_text(&"é".repeat(20), 5);
        assert_eq!(cleaned.chars().count(), 5);
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(sanitize_text("  Leg day (heavy)  ", 1000), "Leg day (heavy)");
        assert_eq!(sanitize_text("", 1000), "");
    }
}
