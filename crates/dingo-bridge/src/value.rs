// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Values received from the script engine.
//
// A callback slot carries plain text. Whether that text names something
// callable is decided once, syntactically, when the reference is built.
// Invoking a literal is a silent no-op: the script supplied a value where
// a function was expected.

use std::collections::HashMap;

use dingo_core::CallbackPolicy;
use dingo_core::config::is_identifier;
use dingo_core::error::Result;
use serde::Serialize;
use tracing::debug;

use crate::channel::{EvalCallback, ScriptChannel};
use crate::lexer;
use crate::transformer::Transformer;

/// Words that can never be the head of a callable path.
const NON_CALLABLE_WORDS: &[&str] = &[
    "true", "false", "null", "undefined", "NaN", "Infinity", "new", "typeof", "void",
    "delete", "function", "return", "var", "let", "const", "class", "this",
];

/// A value captured from a script call, typically from the callback slot.
///
/// Immutable once built. Invocation borrows the reference, so the same
/// callback may be fired any number of times; at-most-once delivery is a
/// per-call-site decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueRef {
    /// Anything that is not function-shaped, including malformed text.
    Literal(String),
    /// Script text that evaluates to a function.
    FunctionRef(String),
}

impl ValueRef {
    /// Classify `raw` under the default policy (function expressions only).
    pub fn parse(raw: impl Into<String>) -> Self {
        Self::parse_with(raw, CallbackPolicy::FunctionExpressions)
    }

    pub fn parse_with(raw: impl Into<String>, policy: CallbackPolicy) -> Self {
        let raw = raw.into();
        if is_function_text(&raw, policy) {
            Self::FunctionRef(raw.trim().to_string())
        } else {
            Self::Literal(raw)
        }
    }

    pub fn is_invokable(&self) -> bool {
        matches!(self, Self::FunctionRef(_))
    }

    /// The text exactly as it will be spliced into script.
    pub fn raw(&self) -> &str {
        match self {
            Self::Literal(s) | Self::FunctionRef(s) => s,
        }
    }

    /// Literal text with one layer of quoting removed.
    pub fn as_text(&self) -> String {
        match self {
            Self::Literal(s) => parse_quotes(s),
            Self::FunctionRef(s) => s.clone(),
        }
    }

    /// Script expression applying this function to already-encoded arguments.
    /// `None` for literals.
    pub fn call_expression(&self, args: &[String]) -> Option<String> {
        let Self::FunctionRef(text) = self else {
            return None;
        };
        let callee = if is_dotted_path(text) {
            text.clone()
        } else {
            format!("({text})")
        };
        Some(format!("{callee}({})", args.join(", ")))
    }

    /// Queue exactly one script evaluation applying this function to `args`.
    ///
    /// Returns whether anything was submitted; literals submit nothing.
    pub fn invoke(
        &self,
        channel: &dyn ScriptChannel,
        args: &[String],
        on_result: Option<EvalCallback>,
    ) -> bool {
        match self.call_expression(args) {
            Some(script) => {
                channel.execute(script, on_result);
                true
            }
            None => {
                debug!(value = %self.raw(), "callback slot holds a literal; skipping invocation");
                false
            }
        }
    }
}

impl std::fmt::Display for ValueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.raw())
    }
}

/// Strip one layer of quotes from a script string literal.
///
/// JSON strings are fully unescaped; single-quoted text just loses its
/// quotes; anything else comes back trimmed.
pub fn parse_quotes(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(s) = serde_json::from_str::<String>(trimmed) {
        return s;
    }
    let bytes = trimmed.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return trimmed[1..trimmed.len() - 1].to_string();
        }
    }
    trimmed.to_string()
}

fn is_function_text(raw: &str, policy: CallbackPolicy) -> bool {
    let text = raw.trim();
    if text.is_empty() || serde_json::from_str::<serde_json::Value>(text).is_ok() {
        return false;
    }
    let Some(pairs) = lexer::bracket_pairs(text) else {
        return false;
    };
    let text = unwrap_parens(text, &pairs);
    if text.is_empty() {
        return false;
    }
    if is_function_expression(text) || is_arrow_function(text) {
        return true;
    }
    policy == CallbackPolicy::NamedFunctions && is_dotted_path(text)
}

/// Peel every `( … )` layer that wraps the whole of `text`, so
/// `(function () {})` is as callable as its contents. Nesting depth comes
/// from script input, so this must not recurse.
fn unwrap_parens<'a>(text: &'a str, pairs: &HashMap<usize, usize>) -> &'a str {
    let (mut start, mut end) = (0, text.len());
    loop {
        let inner = &text[start..end];
        let open = start + (inner.len() - inner.trim_start().len());
        let close = end - (inner.len() - inner.trim_end().len());
        let wrapped = close > open
            && text[open..close].starts_with('(')
            && pairs.get(&open) == Some(&(close - 1));
        if !wrapped {
            return &text[open..close];
        }
        start = open + 1;
        end = close - 1;
    }
}

/// Drop a leading `async` keyword.
fn strip_async(text: &str) -> &str {
    match text.strip_prefix("async") {
        Some(rest) if rest.starts_with(|c: char| c.is_whitespace() || c == '(') => rest.trim_start(),
        _ => text,
    }
}

/// `function name?(params) { body }`, generators included.
fn is_function_expression(text: &str) -> bool {
    let text = strip_async(text);
    let Some(rest) = text.strip_prefix("function") else {
        return false;
    };
    if !rest.starts_with(|c: char| c.is_whitespace() || c == '(' || c == '*') {
        return false;
    }
    let Some(params_at) = rest.find('(').map(|i| i + "function".len()) else {
        return false;
    };
    let name = text["function".len()..params_at].trim().trim_start_matches('*').trim();
    if !name.is_empty() && !is_identifier(name) {
        return false;
    }
    let Some(params_end) = lexer::matching_close(text, params_at) else {
        return false;
    };
    let body = text[params_end + 1..].trim();
    body.starts_with('{') && lexer::matching_close(body, 0) == Some(body.len() - 1)
}

/// `(a, b) => …` or `a => …` with a non-empty body.
fn is_arrow_function(text: &str) -> bool {
    let text = strip_async(text);
    let after_params = if text.starts_with('(') {
        match lexer::matching_close(text, 0) {
            Some(end) => &text[end + 1..],
            None => return false,
        }
    } else {
        let end = text
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .unwrap_or(text.len());
        let param = &text[..end];
        if !is_identifier(param) || NON_CALLABLE_WORDS.contains(&param) {
            return false;
        }
        &text[end..]
    };
    match after_params.trim_start().strip_prefix("=>") {
        Some(body) => !body.trim().is_empty(),
        None => false,
    }
}

/// `window.app.onTap` style references.
fn is_dotted_path(text: &str) -> bool {
    let mut segments = text.split('.');
    let head_ok = segments
        .next()
        .is_some_and(|head| is_identifier(head) && !NON_CALLABLE_WORDS.contains(&head));
    head_ok && segments.all(is_identifier)
}

/// One callback delivery: a target reference plus ordered, encoded arguments.
///
/// Encoding failures are held until [`CallbackInvocation::submit`] so
/// argument chains stay linear.
pub struct CallbackInvocation<'a> {
    target: &'a ValueRef,
    transformer: Transformer,
    args: Vec<String>,
    error: Option<dingo_core::BridgeError>,
    on_result: Option<EvalCallback>,
}

impl<'a> CallbackInvocation<'a> {
    pub fn new(target: &'a ValueRef, transformer: Transformer) -> Self {
        Self {
            target,
            transformer,
            args: Vec::new(),
            error: None,
            on_result: None,
        }
    }

    /// Append a JSON-encoded argument.
    pub fn arg<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        if self.error.is_none() {
            match self.transformer.encode(value) {
                Ok(text) => self.args.push(text),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Append a value's raw text verbatim.
    pub fn raw_arg(mut self, value: &ValueRef) -> Self {
        self.args.push(value.raw().to_string());
        self
    }

    /// Receive the engine's evaluation result, if the channel reports one.
    pub fn on_result(mut self, handler: impl FnOnce(String) + Send + 'static) -> Self {
        self.on_result = Some(Box::new(handler));
        self
    }

    /// The script that would be executed, or `None` for a literal target.
    pub fn script(&self) -> Option<String> {
        self.target.call_expression(&self.args)
    }

    /// Submit to `channel`. `Ok(false)` means the target was a literal.
    pub fn submit(self, channel: &dyn ScriptChannel) -> Result<bool> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(self.target.invoke(channel, &self.args, self.on_result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;

    #[test]
    fn function_expressions_are_invokable() {
        for text in [
            "function (id) { console.log(id); }",
            "function(){}",
            "function onTap(a, b) { return a + b; }",
            "async function () { await x(); }",
            "function* gen() { yield 1; }",
            "  function () { return \"}\"; }  ",
        ] {
            assert!(ValueRef::parse(text).is_invokable(), "{text}");
        }
    }

    #[test]
    fn arrow_functions_are_invokable() {
        for text in [
            "(id) => handle(id)",
            "() => {}",
            "id => { window.last = id; }",
            "async (a, b) => a + b",
            "(a, {b, c}) => b",
            "(function (id) { done(id); })",
        ] {
            assert!(ValueRef::parse(text).is_invokable(), "{text}");
        }
    }

    #[test]
    fn deeply_wrapped_text_is_classified_without_recursing() {
        let depth = 200_000;
        let wrapped = format!("{}x => x{}", "(".repeat(depth), ")".repeat(depth));
        let value = ValueRef::parse(wrapped.as_str());
        assert!(value.is_invokable());
        assert_eq!(value.raw(), wrapped);

        let unclosed = format!("{}x => x", "(".repeat(depth));
        assert!(!ValueRef::parse(unclosed).is_invokable());

        let not_a_function = format!("{}42{}", "( ".repeat(depth), " )".repeat(depth));
        assert!(!ValueRef::parse(not_a_function).is_invokable());

        assert!(!ValueRef::parse("(( ))").is_invokable());
    }

    #[test]
    fn json_literals_are_not_invokable() {
        for text in [
            "\"function () {}\"",
            "42",
            "-1.5e3",
            "null",
            "true",
            "{\"title\":\"x\"}",
            "[1, 2, 3]",
            "\"cancel\"",
        ] {
            assert!(!ValueRef::parse(text).is_invokable(), "{text}");
        }
    }

    #[test]
    fn malformed_text_is_tolerated_as_literal() {
        for text in [
            "",
            "   ",
            "function (",
            "function () { unclosed",
            "=> 1",
            "(a) =>",
            "undefined",
            "functional",
            "'single quoted'",
        ] {
            let value = ValueRef::parse(text);
            assert!(!value.is_invokable(), "{text}");
            assert_eq!(value.raw(), text);
        }
    }

    #[test]
    fn named_functions_need_the_policy() {
        let text = "window.app.onTap";
        assert!(!ValueRef::parse(text).is_invokable());
        assert!(ValueRef::parse_with(text, CallbackPolicy::NamedFunctions).is_invokable());
        assert!(!ValueRef::parse_with("undefined", CallbackPolicy::NamedFunctions).is_invokable());
        assert!(!ValueRef::parse_with("this.x", CallbackPolicy::NamedFunctions).is_invokable());
    }

    #[test]
    fn call_expression_wraps_expressions_but_not_paths() {
        let f = ValueRef::parse("function (a) {}");
        assert_eq!(
            f.call_expression(&["1".into(), "\"x\"".into()]).as_deref(),
            Some("(function (a) {})(1, \"x\")")
        );

        let named = ValueRef::parse_with("app.onTap", CallbackPolicy::NamedFunctions);
        assert_eq!(named.call_expression(&[]).as_deref(), Some("app.onTap()"));

        assert_eq!(ValueRef::parse("3").call_expression(&[]), None);
    }

    #[test]
    fn invoking_a_literal_submits_nothing() {
        let channel = RecordingChannel::new();
        let literal = ValueRef::parse("{\"not\":\"a function\"}");
        assert!(!literal.invoke(&channel, &["1".into()], None));
        assert!(channel.scripts().is_empty());
    }

    #[test]
    fn each_invoke_submits_exactly_one_script() {
        let channel = RecordingChannel::new();
        let cb = ValueRef::parse("id => log(id)");
        assert!(cb.invoke(&channel, &["\"a\"".into()], None));
        assert!(cb.invoke(&channel, &["\"b\"".into()], None));
        assert_eq!(
            channel.scripts(),
            vec!["(id => log(id))(\"a\")", "(id => log(id))(\"b\")"]
        );
    }

    #[test]
    fn invocation_encodes_arguments_in_order() {
        let channel = RecordingChannel::new();
        let cb = ValueRef::parse("function (err, id) {}");
        let sent = CallbackInvocation::new(&cb, Transformer::default())
            .arg(&Option::<String>::None)
            .arg("done")
            .raw_arg(&ValueRef::parse("42"))
            .submit(&channel)
            .expect("submit");
        assert!(sent);
        assert_eq!(
            channel.scripts(),
            vec!["(function (err, id) {})(null, \"done\", 42)"]
        );
    }

    #[test]
    fn invocation_surfaces_encoding_errors() {
        use std::collections::HashMap;

        let channel = RecordingChannel::new();
        let cb = ValueRef::parse("x => x");
        let mut bad: HashMap<(u8, u8), u8> = HashMap::new();
        bad.insert((1, 2), 3);

        let result = CallbackInvocation::new(&cb, Transformer::default())
            .arg(&bad)
            .submit(&channel);
        assert!(matches!(result, Err(dingo_core::BridgeError::Programming(_))));
        assert!(channel.scripts().is_empty());
    }

    #[test]
    fn parse_quotes_variants() {
        assert_eq!(parse_quotes("\"The Dingo Ate My Title\""), "The Dingo Ate My Title");
        assert_eq!(parse_quotes("\"line\\nbreak\""), "line\nbreak");
        assert_eq!(parse_quotes("'single'"), "single");
        assert_eq!(parse_quotes("  bare text "), "bare text");
        assert_eq!(parse_quotes("\""), "\"");
    }
}
