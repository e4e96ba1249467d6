// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One console session: the host thread, the console host, and the bridge
// wired between them.

use std::io::Write;
use std::sync::Arc;

use dingo_bridge::namespaces::NavigationOptions;
use dingo_bridge::{HostThread, NativeBridge, ScriptChannel};
use dingo_core::error::{BridgeError, Result};
use dingo_core::BridgeConfig;
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::console::ConsoleHost;

/// Whether the input loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    host_thread: HostThread,
    console: Arc<ConsoleHost>,
    bridge: NativeBridge,
}

impl Session {
    pub fn new(config: BridgeConfig, channel: Arc<dyn ScriptChannel>) -> Result<Self> {
        let host_thread = HostThread::spawn(&config.host_thread_name)?;
        let console = Arc::new(ConsoleHost::new());
        let bridge = NativeBridge::new(config, channel, console.clone(), host_thread.handle())?;
        Ok(Self {
            host_thread,
            console,
            bridge,
        })
    }

    /// Run one command and wait until the host thread has caught up, so its
    /// output lands before the next prompt.
    pub fn run(&self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::Empty => return Ok(Flow::Continue),
            Command::Quit => return Ok(Flow::Quit),
            Command::Call(line) => {
                // Dropped calls are already logged by the bridge.
                let _ = self.bridge.handle_call(&line);
            }
            Command::Tap(id) => {
                if !self.console.tap(&id) {
                    warn!(id, "no navigation bar buttons are listening");
                }
            }
            Command::Choose(id) => {
                if !self.console.choose(&id) {
                    warn!(id, "no dialog is open");
                }
            }
            Command::Options(json) => match serde_json::from_str::<NavigationOptions>(&json) {
                Ok(options) => self.bridge.navigation_bar().apply_options(options)?,
                Err(e) => warn!(error = %e, "options are not valid NavigationOptions JSON"),
            },
            Command::Appear => self.bridge.navigation_bar().appear()?,
            Command::Methods => {
                for method in self.bridge.surface().methods() {
                    writeln!(out, "{method}")?;
                }
            }
            Command::Bootstrap => write!(out, "{}", self.bridge.bootstrap_script())?,
            Command::Stats => {
                let stats = serde_json::to_string(&self.bridge.stats())
                    .map_err(|e| BridgeError::Programming(e.to_string()))?;
                writeln!(out, "{stats}")?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
        }
        self.host_thread.handle().sync()?;
        Ok(Flow::Continue)
    }

    pub fn shutdown(self) -> Result<()> {
        let stats = self.bridge.stats();
        info!(
            received = stats.received,
            completed = stats.completed,
            dropped = stats.dropped,
            "session ending"
        );
        self.host_thread.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dingo_bridge::RecordingChannel;

    fn session() -> (Session, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel::new());
        let session = Session::new(BridgeConfig::default(), channel.clone()).expect("session");
        (session, channel)
    }

    fn run(session: &Session, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = session.run(Command::parse(line), &mut out).expect("run");
        (flow, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn tap_after_set_buttons_calls_back() {
        let (session, channel) = session();
        run(&session, r#"navigationBar.setButtons([{"title":"Back","id":"back"}], function (id) { go(id); })"#);
        run(&session, "tap back");
        assert_eq!(channel.scripts(), vec![r#"(function (id) { go(id); })("back")"#]);
    }

    #[test]
    fn choose_answers_dialog() {
        let (session, channel) = session();
        run(
            &session,
            r#"platform.dialog({"title":"Sure?","actions":[{"id":"cancel","label":"No"},{"id":"yes","label":"Yes"}]}, (e, id) => answer(e, id))"#,
        );
        run(&session, "choose yes");
        run(&session, "choose cancel");
        assert_eq!(channel.scripts(), vec![r#"((e, id) => answer(e, id))("", "yes")"#]);
    }

    #[test]
    fn options_then_appear() {
        let (session, channel) = session();
        run(&session, r#"options {"title":"Home","onAppear":"function () { ready(); }"}"#);
        run(&session, "appear");
        assert_eq!(channel.scripts(), vec!["(function () { ready(); })()"]);
    }

    #[test]
    fn listing_and_stats() {
        let (session, _) = session();
        let (_, methods) = run(&session, "methods");
        assert!(methods.lines().any(|m| m == "platform.dialog"));

        run(&session, "foo.bar('{}', null)");
        let (_, stats) = run(&session, "stats");
        let stats: serde_json::Value = serde_json::from_str(&stats).expect("json");
        assert_eq!(stats["dropped"], 1);

        let (_, bootstrap) = run(&session, "bootstrap");
        assert!(bootstrap.contains("NativeBridge"));
    }

    #[test]
    fn quit_stops_the_loop() {
        let (session, _) = session();
        assert_eq!(run(&session, "quit").0, Flow::Quit);
        session.shutdown().expect("shutdown");
    }
}
