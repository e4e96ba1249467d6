// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dingo — console host
//
// Entry point. Initialises logging, loads the bridge configuration, and plays
// the web view's part: each stdin line is a script call or a console command,
// and every script the bridge sends back is printed as `>> <script>`.

mod command;
mod config_path;
mod console;
mod session;

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use dingo_bridge::{EngineChannel, EvalCallback};
use dingo_core::{BridgeConfig, HostContext};

use command::Command;
use session::{Flow, Session};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Dingo console starting");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "console failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> dingo_core::error::Result<()> {
    let config = match config_path::config_path() {
        Some(path) => BridgeConfig::load_or_default(path),
        None => BridgeConfig::default(),
    };

    let context = HostContext::current_process("dingo", Some(env!("CARGO_PKG_VERSION").to_string()));
    let channel = Arc::new(EngineChannel::new(context, |script: String, on_result: Option<EvalCallback>| {
        println!(">> {script}");
        if let Some(on_result) = on_result {
            on_result("undefined".to_string());
        }
    }));

    let session = Session::new(config, channel)?;
    println!("{}", command::HELP);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let flow = session.run(Command::parse(&line?), &mut stdout)?;
        stdout.flush()?;
        if flow == Flow::Quit {
            break;
        }
    }

    session.shutdown()
}
