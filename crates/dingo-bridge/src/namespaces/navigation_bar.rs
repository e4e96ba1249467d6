// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `navigationBar` namespace: page title and bar buttons.
//
// ```js
// NativeBridge.navigationBar.setTitle("The Dingo Ate My Title");
// NativeBridge.navigationBar.setButtons(
//   [{ title: "Cancel", id: "cancel" }, { title: "Done", id: "done" }],
//   function (buttonId) { /* handle tap */ });
// ```

use std::sync::{Arc, Mutex, PoisonError};

use dingo_core::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::dispatch::{BridgeContext, DispatchSurfaceBuilder};
use crate::traits::{Button, ButtonClickListener, HostPlatform};
use crate::value::ValueRef;

pub const NAMESPACE: &str = "navigationBar";

/// Options a page is pushed with. Callbacks travel as function source text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationOptions {
    pub title: Option<String>,
    pub navigation_bar_buttons: Option<Vec<Button>>,
    /// Stringified `function (buttonId) { … }`.
    pub on_navigation_bar_button_tap: Option<String>,
    /// Stringified `function () { … }` run when the page becomes visible.
    pub on_appear: Option<String>,
}

/// Methods exposed in the `navigationBar` namespace.
pub struct NavigationBarBridge {
    ctx: BridgeContext,
    host: Arc<dyn HostPlatform>,
    on_appear: Mutex<Option<ValueRef>>,
}

impl NavigationBarBridge {
    pub fn new(ctx: BridgeContext, host: Arc<dyn HostPlatform>) -> Arc<Self> {
        Arc::new(Self {
            ctx,
            host,
            on_appear: Mutex::new(None),
        })
    }

    /// Add `setTitle` and `setButtons` to the dispatch table.
    pub fn register(self: &Arc<Self>, builder: DispatchSurfaceBuilder) -> DispatchSurfaceBuilder {
        let title_bridge = Arc::clone(self);
        let buttons_bridge = Arc::clone(self);
        builder
            .register_text(NAMESPACE, "setTitle", move |title, _| {
                title_bridge.set_title(&title)
            })
            .register(
                NAMESPACE,
                "setButtons",
                move |buttons: Option<Vec<Button>>, callback| {
                    buttons_bridge.set_buttons(buttons, callback)
                },
            )
    }

    #[instrument(skip(self))]
    fn set_title(&self, title: &str) {
        if let Err(e) = self.host.set_title(title) {
            warn!(error = %e, "could not set title");
        }
    }

    /// `null` buttons clear the bar and install no listener.
    #[instrument(skip_all, fields(count = buttons.as_ref().map(Vec::len)))]
    fn set_buttons(&self, buttons: Option<Vec<Button>>, callback: Option<ValueRef>) {
        let listener = buttons.as_ref().map(|_| self.click_listener(callback));
        let buttons = buttons.unwrap_or_default();
        if let Err(e) = self.host.set_buttons(&buttons, listener) {
            warn!(error = %e, "could not set navigation bar buttons");
        }
    }

    /// Listener that, per tap, posts `callback(buttonId)` to the host thread.
    fn click_listener(&self, callback: Option<ValueRef>) -> ButtonClickListener {
        let ctx = self.ctx.clone();
        Arc::new(move |id: &str| {
            let Some(callback) = callback.clone().filter(ValueRef::is_invokable) else {
                debug!(id, "button tapped; no callback to notify");
                return;
            };
            let id = id.to_string();
            let deliver_ctx = ctx.clone();
            let posted = ctx.host.schedule(move || {
                deliver_ctx.deliver(deliver_ctx.invocation(&callback).arg(&id));
            });
            if let Err(e) = posted {
                warn!(error = %e, "dropping button tap");
            }
        })
    }

    /// Apply the options a page was pushed with, on the host thread.
    pub fn apply_options(self: &Arc<Self>, options: NavigationOptions) -> Result<()> {
        let this = Arc::clone(self);
        self.ctx.host.schedule(move || {
            if let Some(title) = options.title.as_deref() {
                this.set_title(title);
            }
            let tap = options
                .on_navigation_bar_button_tap
                .as_deref()
                .map(|raw| this.ctx.value(raw));
            if options.navigation_bar_buttons.is_some() {
                this.set_buttons(options.navigation_bar_buttons, tap);
            }
            *this.on_appear.lock().unwrap_or_else(PoisonError::into_inner) =
                options.on_appear.as_deref().map(|raw| this.ctx.value(raw));
        })
    }

    /// Run the page's `onAppear` callback, if one was supplied.
    pub fn appear(self: &Arc<Self>) -> Result<()> {
        let this = Arc::clone(self);
        self.ctx.host.schedule(move || {
            let on_appear = this
                .on_appear
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            if let Some(on_appear) = on_appear {
                this.ctx.deliver(this.ctx.invocation(&on_appear));
            }
        })
    }
}
