// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host capabilities the domain
// namespaces drive.
//
// Every method is called on the host thread. Listeners handed to the host
// may be fired from any thread; they marshal back onto the host thread
// themselves.

use std::sync::Arc;

use dingo_core::error::Result;
use serde::{Deserialize, Serialize};

/// Unified host that groups every capability the bridge needs.
///
/// Platforms that lack a capability return
/// `BridgeError::PlatformUnavailable`, as the stub host does.
pub trait HostPlatform: NavigationBarHost + NativeDialog + NativeShare + Send + Sync {
    /// Human-readable platform name (e.g. "Android 14", "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// Fired with the id of the tapped button.
pub type ButtonClickListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Fired with the id of the chosen dialog action.
pub type DialogActionListener = Arc<dyn Fn(&str) + Send + Sync>;

/// The title bar above the web view.
pub trait NavigationBarHost {
    /// Replace the page title.
    fn set_title(&self, title: &str) -> Result<()>;

    /// Replace the bar's buttons. `on_click` is `None` when the page cleared
    /// its buttons.
    fn set_buttons(&self, buttons: &[Button], on_click: Option<ButtonClickListener>) -> Result<()>;
}

/// Modal alert dialogs.
pub trait NativeDialog {
    /// Present `dialog`. Returns once it is shown; the choice arrives later
    /// through `on_action`.
    fn show_dialog(&self, dialog: &DialogSpec, on_action: DialogActionListener) -> Result<()>;
}

/// The OS share sheet.
pub trait NativeShare {
    /// Share a short text (typically a URL) with a subject line.
    fn share_text(&self, subject: &str, text: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Value types handed to the host
// ---------------------------------------------------------------------------

/// A navigation bar button as the page describes it.
///
/// Missing fields decode as empty strings rather than rejecting the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Button {
    pub title: String,
    /// Reported back to the page when tapped.
    pub id: String,
}

/// Placement of a dialog button, following the common
/// negative / neutral / positive alert layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonRole {
    Negative,
    Neutral,
    Positive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    pub role: ButtonRole,
    pub label: String,
    pub id: String,
}

/// A fully resolved dialog, ready to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogSpec {
    pub title: String,
    pub message: String,
    pub buttons: Vec<DialogButton>,
}
