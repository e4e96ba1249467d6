// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsing of the textual call shape `<namespace>.<method>(args [, callback])`.
//
// Leading object paths (`window.NativeBridge.`) are ignored: the last two
// segments before the parenthesis name the entry point.

use dingo_core::CallbackPolicy;
use dingo_core::config::is_identifier;
use dingo_core::error::{BridgeError, Result};

use crate::dispatch::DispatchRequest;
use crate::lexer;
use crate::value::ValueRef;

impl DispatchRequest {
    /// Parse one call line under the default callback policy.
    pub fn parse_call(line: &str) -> Result<Self> {
        Self::parse_call_with(line, CallbackPolicy::FunctionExpressions)
    }

    /// Parse one call line.
    ///
    /// A single argument is the callback when it is function-shaped and the
    /// argument payload otherwise. `null`/`undefined` in either slot count as
    /// absent. A single-quoted string payload is replaced by its contents, so
    /// `'{"id":1}'` carries the JSON text `{"id":1}`.
    pub fn parse_call_with(line: &str, policy: CallbackPolicy) -> Result<Self> {
        let line = line.trim().trim_end_matches(';').trim_end();
        let open = line
            .find('(')
            .ok_or_else(|| malformed("missing '('", line))?;
        let close = lexer::matching_close(line, open)
            .ok_or_else(|| malformed("unbalanced arguments", line))?;
        if close != line.len() - 1 {
            return Err(malformed("trailing text after ')'", line));
        }

        let mut path = line[..open].trim().rsplit('.');
        let method = path.next().unwrap_or_default().trim();
        let namespace = path
            .next()
            .ok_or_else(|| malformed("expected <namespace>.<method>", line))?
            .trim();
        if !is_identifier(namespace) || !is_identifier(method) {
            return Err(malformed("namespace and method must be identifiers", line));
        }

        let mut parts = lexer::split_top_level(&line[open + 1..close])
            .ok_or_else(|| malformed("unbalanced arguments", line))?;
        if parts.last() == Some(&"") {
            parts.pop();
        }

        let (args, callback) = match parts.as_slice() {
            [] => (None, None),
            [only] if ValueRef::parse_with(*only, policy).is_invokable() => (None, Some(*only)),
            [only] => (Some(*only), None),
            [args, callback] => (Some(*args), Some(*callback)),
            _ => return Err(malformed("at most two arguments are allowed", line)),
        };

        let mut request = Self::new(namespace, method);
        request.args = args
            .filter(|a| !matches!(*a, "null" | "undefined"))
            .map(|a| unquote_single(a).unwrap_or_else(|| a.to_string()));
        request.callback = callback
            .filter(|c| !matches!(*c, "null" | "undefined"))
            .map(str::to_string);
        Ok(request)
    }
}

/// Contents of a `'…'` script string literal, unescaped.
fn unquote_single(text: &str) -> Option<String> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        // An unescaped quote means the literal ended before the last char.
        if c == '\'' {
            return None;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => return None,
        }
    }
    Some(out)
}

fn malformed(reason: &str, line: &str) -> BridgeError {
    BridgeError::MalformedCall(format!("{reason}: {line}"))
}
