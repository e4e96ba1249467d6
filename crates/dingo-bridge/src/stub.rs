// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub host for desktop/CI builds where no native UI is attached.
//
// Every capability returns `PlatformUnavailable`; real hosts are supplied by
// the embedding application.

use dingo_core::error::{BridgeError, Result};

use crate::traits::*;

/// No-op host returned when the embedder supplies none.
pub struct StubHost;

impl HostPlatform for StubHost {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl NavigationBarHost for StubHost {
    fn set_title(&self, _title: &str) -> Result<()> {
        tracing::warn!("NavigationBarHost::set_title called on stub host");
        Err(BridgeError::PlatformUnavailable)
    }

    fn set_buttons(&self, _buttons: &[Button], _on_click: Option<ButtonClickListener>) -> Result<()> {
        tracing::warn!("NavigationBarHost::set_buttons called on stub host");
        Err(BridgeError::PlatformUnavailable)
    }
}

impl NativeDialog for StubHost {
    fn show_dialog(&self, _dialog: &DialogSpec, _on_action: DialogActionListener) -> Result<()> {
        tracing::warn!("NativeDialog::show_dialog called on stub host");
        Err(BridgeError::PlatformUnavailable)
    }
}

impl NativeShare for StubHost {
    fn share_text(&self, _subject: &str, _text: &str) -> Result<()> {
        tracing::warn!("NativeShare::share_text called on stub host");
        Err(BridgeError::PlatformUnavailable)
    }
}
