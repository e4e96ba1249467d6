// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Delimiter-aware scanning of script fragments.
//
// Only what the bridge needs: matching brackets, string literals ('…', "…",
// `…`) with backslash escapes, and top-level comma splitting. Comments and
// regex literals are not understood.

use std::collections::HashMap;

/// Walk `src`, calling `visit(byte_index, char, depth)` for every character
/// outside string literals. Returns `None` if a string is unterminated or
/// brackets do not pair up.
fn scan(src: &str, mut visit: impl FnMut(usize, char, usize) -> bool) -> Option<()> {
    let mut stack: Vec<char> = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in src.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => {
                quote = Some(c);
                continue;
            }
            '(' | '[' | '{' => {
                if !visit(i, c, stack.len()) {
                    return Some(());
                }
                stack.push(c);
                continue;
            }
            ')' | ']' | '}' => {
                let open = stack.pop()?;
                if !pairs(open, c) {
                    return None;
                }
                if !visit(i, c, stack.len()) {
                    return Some(());
                }
                continue;
            }
            _ => {}
        }
        if !visit(i, c, stack.len()) {
            return Some(());
        }
    }

    if quote.is_some() || !stack.is_empty() {
        return None;
    }
    Some(())
}

fn pairs(open: char, close: char) -> bool {
    matches!((open, close), ('(', ')') | ('[', ']') | ('{', '}'))
}

/// Every bracket pair in `src`, as opener byte index to closer byte index.
/// `None` when the input is unbalanced.
pub(crate) fn bracket_pairs(src: &str) -> Option<HashMap<usize, usize>> {
    let mut open = Vec::new();
    let mut found = HashMap::new();
    scan(src, |i, c, _| {
        match c {
            '(' | '[' | '{' => open.push(i),
            ')' | ']' | '}' => {
                if let Some(opener) = open.pop() {
                    found.insert(opener, i);
                }
            }
            _ => {}
        }
        true
    })?;
    Some(found)
}

/// Byte index of the bracket closing the one at `open_idx`.
pub(crate) fn matching_close(src: &str, open_idx: usize) -> Option<usize> {
    let open = src[open_idx..].chars().next()?;
    if !matches!(open, '(' | '[' | '{') {
        return None;
    }
    let mut found = None;
    // Scan from the opener so depth 0 is the opener's own level.
    scan(&src[open_idx..], |i, c, depth| {
        if i > 0 && depth == 0 && pairs(open, c) {
            found = Some(open_idx + i);
            return false;
        }
        true
    });
    found
}

/// Split on commas at bracket depth zero. An empty (all-whitespace) input
/// yields no parts. `None` when the input is unbalanced.
pub(crate) fn split_top_level(src: &str) -> Option<Vec<&str>> {
    if src.trim().is_empty() {
        return Some(Vec::new());
    }
    let mut parts = Vec::new();
    let mut start = 0;
    scan(src, |i, c, depth| {
        if c == ',' && depth == 0 {
            parts.push(src[start..i].trim());
            start = i + 1;
        }
        true
    })?;
    parts.push(src[start..].trim());
    Some(parts)
}
