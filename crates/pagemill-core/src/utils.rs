//! Utility functions for safe string operations

use std::borrow::Cow;

/// Collapse runs of whitespace into single spaces.
///
/// Borrows the input when it is already collapsed and only allocates when
/// the content actually changes, so the common case of clean text costs
/// nothing.
///
/// # Examples
/// ```
/// use std::borrow::Cow;
/// use pagemill_core::utils::collapse_whitespace;
///
/// assert!(matches!(collapse_whitespace("already clean"), Cow::Borrowed(_)));
/// assert_eq!(collapse_whitespace("a \n\t b"), "a b");
/// ```
#[must_use]
pub fn collapse_whitespace(input: &str) -> Cow<'_, str> {
    let needs_rewrite = {
        let mut prev_was_space = false;
        let mut found = false;
        for ch in input.chars() {
            if ch.is_whitespace() {
                if prev_was_space || ch != ' ' {
                    found = true;
                    break;
                }
                prev_was_space = true;
            } else {
                prev_was_space = false;
            }
        }
        found
    };

    if !needs_rewrite {
        return Cow::Borrowed(input);
    }

    let mut collapsed = String::with_capacity(input.len());
    let mut prev_was_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                collapsed.push(' ');
            }
            prev_was_space = true;
        } else {
            collapsed.push(ch);
            prev_was_space = false;
        }
    }

    Cow::Owned(collapsed)
}

/// Find the largest valid UTF-8 boundary at or below `target_pos`.
///
/// # Arguments
/// * `s` - The string to search in
/// * `target_pos` - The target byte position
pub fn floor_char_boundary(s: &str, target_pos: usize) -> usize {
    if target_pos >= s.len() {
        return s.len();
    }

    let mut pos = target_pos;
    while pos > 0 && !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Byte offset of the `n`-th character of `s`, or `s.len()` when `s` has
/// fewer than `n` characters.
pub fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}
