// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Console host. Prints what a native UI would show and keeps the listeners
// so `tap` and `choose` can fire them.

use std::sync::{Mutex, MutexGuard, PoisonError};

use dingo_bridge::traits::*;
use dingo_core::error::Result;
use tracing::debug;

#[derive(Default)]
struct Listeners {
    on_click: Option<ButtonClickListener>,
    on_action: Option<DialogActionListener>,
}

#[derive(Default)]
pub struct ConsoleHost {
    listeners: Mutex<Listeners>,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fire the navigation bar listener. `false` if none is installed.
    pub fn tap(&self, id: &str) -> bool {
        let Some(listener) = self.listeners().on_click.clone() else {
            return false;
        };
        listener(id);
        true
    }

    /// Answer the open dialog, which then closes. `false` if none is open.
    pub fn choose(&self, id: &str) -> bool {
        let Some(listener) = self.listeners().on_action.take() else {
            return false;
        };
        listener(id);
        true
    }
}

impl HostPlatform for ConsoleHost {
    fn platform_name(&self) -> &str {
        "Console"
    }
}

impl NavigationBarHost for ConsoleHost {
    fn set_title(&self, title: &str) -> Result<()> {
        println!("[title] {title}");
        Ok(())
    }

    fn set_buttons(&self, buttons: &[Button], on_click: Option<ButtonClickListener>) -> Result<()> {
        let labels: Vec<String> = buttons
            .iter()
            .map(|b| format!("{} ({})", b.title, b.id))
            .collect();
        println!("[buttons] {}", labels.join(" | "));
        debug!(listener = on_click.is_some(), "navigation bar updated");
        self.listeners().on_click = on_click;
        Ok(())
    }
}

impl NativeDialog for ConsoleHost {
    fn show_dialog(&self, dialog: &DialogSpec, on_action: DialogActionListener) -> Result<()> {
        println!("[dialog] {}: {}", dialog.title, dialog.message);
        for button in &dialog.buttons {
            println!("  {:?}: {} ({})", button.role, button.label, button.id);
        }
        self.listeners().on_action = Some(on_action);
        Ok(())
    }
}

impl NativeShare for ConsoleHost {
    fn share_text(&self, subject: &str, text: &str) -> Result<()> {
        println!("[share] {subject}: {text}");
        Ok(())
    }
}
