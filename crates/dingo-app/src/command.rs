// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console input lines.

/// One line typed at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank line or `#` comment.
    Empty,
    /// A script call such as `platform.info(i => show(i))`.
    Call(String),
    /// Simulate a navigation bar tap.
    Tap(String),
    /// Simulate choosing an action on the open dialog.
    Choose(String),
    /// Push page options (`NavigationOptions` JSON).
    Options(String),
    /// Fire the page's `onAppear` callback.
    Appear,
    Methods,
    Bootstrap,
    Stats,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Self::Empty;
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match (word, rest.is_empty()) {
            ("tap", false) => Self::Tap(rest.to_string()),
            ("choose", false) => Self::Choose(rest.to_string()),
            ("options", false) => Self::Options(rest.to_string()),
            ("appear", true) => Self::Appear,
            ("methods", true) => Self::Methods,
            ("bootstrap", true) => Self::Bootstrap,
            ("stats", true) => Self::Stats,
            ("help", true) => Self::Help,
            ("quit" | "exit", true) => Self::Quit,
            _ => Self::Call(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
  <namespace>.<method>(args[, callback])   call into the bridge
  tap <id>                                 tap a navigation bar button
  choose <id>                              choose an action on the open dialog
  options <json>                           push page options
  appear                                   run the page's onAppear callback
  methods | bootstrap | stats | help | quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_words() {
        assert_eq!(Command::parse("  "), Command::Empty);
        assert_eq!(Command::parse("# note"), Command::Empty);
        assert_eq!(Command::parse("tap  cancel "), Command::Tap("cancel".into()));
        assert_eq!(Command::parse("choose ok"), Command::Choose("ok".into()));
        assert_eq!(
            Command::parse(r#"options {"title":"Home"}"#),
            Command::Options(r#"{"title":"Home"}"#.into())
        );
        assert_eq!(Command::parse("appear"), Command::Appear);
        assert_eq!(Command::parse("methods"), Command::Methods);
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn everything_else_is_a_call() {
        assert_eq!(
            Command::parse("platform.info(i => show(i));"),
            Command::Call("platform.info(i => show(i));".into())
        );
        // A bare word without its argument is not a console command.
        assert_eq!(Command::parse("tap"), Command::Call("tap".into()));
    }
}
