// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory host used by the namespace and bridge tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use dingo_core::error::{BridgeError, Result};

use crate::traits::*;

#[derive(Default)]
struct Recorded {
    titles: Vec<String>,
    buttons: Vec<Button>,
    on_click: Option<ButtonClickListener>,
    dialogs: Vec<DialogSpec>,
    on_action: Option<DialogActionListener>,
    shares: Vec<(String, String)>,
}

/// Records every capability call and lets tests fire the stored listeners.
#[derive(Default)]
pub struct FakeHost {
    recorded: Mutex<Recorded>,
    refuse_dialogs: bool,
}

impl FakeHost {
    pub fn refusing_dialogs() -> Self {
        Self {
            refuse_dialogs: true,
            ..Self::default()
        }
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn titles(&self) -> Vec<String> {
        self.recorded().titles.clone()
    }

    pub fn buttons(&self) -> Vec<Button> {
        self.recorded().buttons.clone()
    }

    pub fn dialogs(&self) -> Vec<DialogSpec> {
        self.recorded().dialogs.clone()
    }

    pub fn shares(&self) -> Vec<(String, String)> {
        self.recorded().shares.clone()
    }

    /// Simulate a navigation bar tap. `false` when no listener is installed.
    pub fn tap(&self, id: &str) -> bool {
        let Some(listener) = self.recorded().on_click.clone() else {
            return false;
        };
        listener(id);
        true
    }

    /// Simulate choosing an action on the last dialog shown.
    pub fn choose(&self, id: &str) -> bool {
        let Some(listener) = self.recorded().on_action.clone() else {
            return false;
        };
        listener(id);
        true
    }
}

impl HostPlatform for FakeHost {
    fn platform_name(&self) -> &str {
        "Fake"
    }
}

impl NavigationBarHost for FakeHost {
    fn set_title(&self, title: &str) -> Result<()> {
        self.recorded().titles.push(title.to_string());
        Ok(())
    }

    fn set_buttons(&self, buttons: &[Button], on_click: Option<ButtonClickListener>) -> Result<()> {
        let mut recorded = self.recorded();
        recorded.buttons = buttons.to_vec();
        recorded.on_click = on_click;
        Ok(())
    }
}

impl NativeDialog for FakeHost {
    fn show_dialog(&self, dialog: &DialogSpec, on_action: DialogActionListener) -> Result<()> {
        if self.refuse_dialogs {
            return Err(BridgeError::Bridge("dialogs disabled".into()));
        }
        let mut recorded = self.recorded();
        recorded.dialogs.push(dialog.clone());
        recorded.on_action = Some(on_action);
        Ok(())
    }
}

impl NativeShare for FakeHost {
    fn share_text(&self, subject: &str, text: &str) -> Result<()> {
        self.recorded()
            .shares
            .push((subject.to_string(), text.to_string()));
        Ok(())
    }
}
