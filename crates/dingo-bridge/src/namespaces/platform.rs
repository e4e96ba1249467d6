// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `platform` namespace: device info, alert dialogs, and the share sheet.
//
// ```js
// NativeBridge.platform.info(function (info) { /* {appVersion, platform, device} */ });
// NativeBridge.platform.dialog(
//   { title: "Delete?", message: "This cannot be undone.",
//     actions: [{ id: "cancel", label: "Keep" }, { id: "ok", label: "Delete" }] },
//   function (error, id) { /* error is "" on a tap */ });
// NativeBridge.platform.share({ message: "Look", url: "https://example.org" });
// ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::dispatch::{BridgeContext, DispatchSurfaceBuilder};
use crate::traits::{ButtonRole, DialogActionListener, DialogButton, DialogSpec, HostPlatform};
use crate::value::ValueRef;

pub const NAMESPACE: &str = "platform";

/// Error string passed to a dialog callback when nothing was shown.
pub const DIALOG_FAILURE: &str = "Could not create dialog";

/// Reported to `platform.info` callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub app_version: String,
    pub platform: String,
    pub device: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogData {
    pub title: String,
    pub message: String,
    pub actions: Vec<DialogAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogAction {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareData {
    pub message: String,
    pub url: String,
}

/// Resolve the page's actions into a presentable dialog.
///
/// `cancel` (any case) is the negative button; the first other non-empty id
/// is neutral and later ones positive. Empty ids are skipped. `None` when no
/// action survives.
pub fn build_dialog(data: &DialogData) -> Option<DialogSpec> {
    let mut neutral_taken = false;
    let mut buttons = Vec::new();
    for action in &data.actions {
        let role = if action.id.eq_ignore_ascii_case("cancel") {
            ButtonRole::Negative
        } else if action.id.is_empty() {
            continue;
        } else if neutral_taken {
            ButtonRole::Positive
        } else {
            neutral_taken = true;
            ButtonRole::Neutral
        };
        buttons.push(DialogButton {
            role,
            label: action.label.clone(),
            id: action.id.clone(),
        });
    }
    if buttons.is_empty() {
        return None;
    }
    Some(DialogSpec {
        title: data.title.clone(),
        message: data.message.clone(),
        buttons,
    })
}

/// Methods exposed in the `platform` namespace.
pub struct PlatformBridge {
    ctx: BridgeContext,
    host: Arc<dyn HostPlatform>,
}

impl PlatformBridge {
    pub fn new(ctx: BridgeContext, host: Arc<dyn HostPlatform>) -> Arc<Self> {
        Arc::new(Self { ctx, host })
    }

    /// Add `info`, `dialog` and `share` to the dispatch table.
    pub fn register(self: &Arc<Self>, builder: DispatchSurfaceBuilder) -> DispatchSurfaceBuilder {
        let info_bridge = Arc::clone(self);
        let dialog_bridge = Arc::clone(self);
        let share_bridge = Arc::clone(self);
        builder
            .register(NAMESPACE, "info", move |_: IgnoredAny, callback| {
                info_bridge.info(callback)
            })
            .register(NAMESPACE, "dialog", move |data: DialogData, callback| {
                dialog_bridge.dialog(data, callback)
            })
            .register(NAMESPACE, "share", move |data: ShareData, _| {
                share_bridge.share(data)
            })
    }

    /// Device and app details drawn from the channel's host context.
    pub fn info_snapshot(&self) -> Info {
        let context = self.ctx.channel.host_context();
        Info {
            app_version: context
                .app_version
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            platform: context.os_version.clone(),
            device: context.device_model.clone(),
        }
    }

    fn info(&self, callback: Option<ValueRef>) {
        let Some(callback) = callback else {
            debug!("platform.info called without a callback");
            return;
        };
        let info = self.info_snapshot();
        self.ctx.deliver(self.ctx.invocation(&callback).arg(&info));
    }

    #[instrument(skip_all, fields(title = %data.title, actions = data.actions.len()))]
    fn dialog(&self, data: DialogData, callback: Option<ValueRef>) {
        let reply = DialogReply::new(self.ctx.clone(), callback);
        let Some(dialog) = build_dialog(&data) else {
            warn!("dialog has no usable actions");
            reply.send(DIALOG_FAILURE, "");
            return;
        };

        let listener_reply = reply.clone();
        let host = self.ctx.host.clone();
        let on_action: DialogActionListener = Arc::new(move |id: &str| {
            let reply = listener_reply.clone();
            let id = id.to_string();
            if let Err(e) = host.schedule(move || reply.send("", &id)) {
                warn!(error = %e, "dropping dialog choice");
            }
        });

        if let Err(e) = self.host.show_dialog(&dialog, on_action) {
            warn!(error = %e, "could not show dialog");
            reply.send(DIALOG_FAILURE, "");
        }
    }

    #[instrument(skip_all)]
    fn share(&self, data: ShareData) {
        if let Err(e) = self.host.share_text(&data.message, &data.url) {
            warn!(error = %e, "could not share");
        }
    }
}

/// Delivers at most one `(error, id)` pair to a dialog's callback. A tap
/// reports an empty error string.
#[derive(Clone)]
struct DialogReply {
    ctx: BridgeContext,
    callback: Option<ValueRef>,
    sent: Arc<AtomicBool>,
}

impl DialogReply {
    fn new(ctx: BridgeContext, callback: Option<ValueRef>) -> Self {
        Self {
            ctx,
            callback,
            sent: Arc::new(AtomicBool::new(false)),
        }
    }

    fn send(&self, error: &str, id: &str) {
        if self.sent.swap(true, Ordering::AcqRel) {
            debug!(id, "dialog already answered");
            return;
        }
        if let Some(callback) = &self.callback {
            self.ctx
                .deliver(self.ctx.invocation(callback).arg(error).arg(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use crate::dispatch::{DispatchRequest, DispatchSurface};
    use crate::marshaller::HostThread;
    use crate::testing::FakeHost;
    use dingo_core::{BridgeConfig, HostContext};

    struct Fixture {
        host_thread: HostThread,
        channel: Arc<RecordingChannel>,
        host: Arc<FakeHost>,
        surface: DispatchSurface,
    }

    fn fixture_with(host: FakeHost) -> Fixture {
        let host_thread = HostThread::spawn("platform-test").expect("spawn");
        let channel = Arc::new(RecordingChannel::with_context(HostContext {
            app_id: "org.example.dingo".into(),
            app_version: Some("2.4.1".into()),
            os_version: "34".into(),
            device_model: "Pixel 8".into(),
        }));
        let host = Arc::new(host);
        let ctx = BridgeContext::new(BridgeConfig::default(), channel.clone(), host_thread.handle());
        let surface = PlatformBridge::new(ctx.clone(), host.clone())
            .register(DispatchSurface::builder(ctx))
            .build()
            .expect("build");
        Fixture { host_thread, channel, host, surface }
    }

    fn fixture() -> Fixture {
        fixture_with(FakeHost::default())
    }

    impl Fixture {
        fn sync(&self) {
            self.host_thread.handle().sync().expect("sync");
        }
    }

    fn action(id: &str, label: &str) -> DialogAction {
        DialogAction {
            id: id.into(),
            label: label.into(),
        }
    }

    #[test]
    fn roles_follow_cancel_then_neutral_then_positive() {
        let data = DialogData {
            title: "T".into(),
            message: "M".into(),
            actions: vec![
                action("later", "Later"),
                action("", "Ignored"),
                action("CANCEL", "No"),
                action("ok", "Yes"),
            ],
        };
        let dialog = build_dialog(&data).expect("dialog");
        let roles: Vec<_> = dialog.buttons.iter().map(|b| (b.id.as_str(), b.role)).collect();
        assert_eq!(
            roles,
            vec![
                ("later", ButtonRole::Neutral),
                ("CANCEL", ButtonRole::Negative),
                ("ok", ButtonRole::Positive),
            ]
        );
    }

    #[test]
    fn no_usable_actions_builds_nothing() {
        assert!(build_dialog(&DialogData::default()).is_none());
        let only_empty = DialogData {
            actions: vec![action("", "Nope")],
            ..DialogData::default()
        };
        assert!(build_dialog(&only_empty).is_none());
    }

    #[test]
    fn info_reports_host_context() {
        let f = fixture();
        f.surface
            .handle_call("platform.info(function (info) { show(info); })")
            .expect("handled");
        f.sync();

        let scripts = f.channel.scripts();
        assert_eq!(scripts.len(), 1);
        let arg = scripts[0]
            .strip_prefix("(function (info) { show(info); })(")
            .and_then(|rest| rest.strip_suffix(')'))
            .expect("single call");
        let info: Info = serde_json::from_str(arg).expect("info json");
        assert_eq!(
            info,
            Info {
                app_version: "2.4.1".into(),
                platform: "34".into(),
                device: "Pixel 8".into(),
            }
        );
        assert!(arg.contains("\"appVersion\""));
    }

    #[test]
    fn info_without_app_version_says_unknown() {
        let host_thread = HostThread::spawn("platform-info").expect("spawn");
        let channel = Arc::new(RecordingChannel::with_context(HostContext {
            app_version: None,
            ..HostContext::default()
        }));
        let ctx = BridgeContext::new(BridgeConfig::default(), channel, host_thread.handle());
        let bridge = PlatformBridge::new(ctx, Arc::new(FakeHost::default()));
        assert_eq!(bridge.info_snapshot().app_version, "Unknown");
    }

    #[test]
    fn info_ignores_stray_arguments() {
        let f = fixture();
        f.surface
            .handle(
                DispatchRequest::new(NAMESPACE, "info")
                    .with_args(r#"{"verbose":true}"#)
                    .with_callback("i => show(i)"),
            )
            .expect("handled");
        f.sync();
        assert_eq!(f.channel.scripts().len(), 1);
    }

    #[test]
    fn empty_dialog_reports_failure_once() {
        let f = fixture();
        f.surface
            .handle_call(r#"platform.dialog('{"title":"T","message":"M","actions":[]}', function (e, id) { done(e, id); })"#)
            .expect("handled");
        f.sync();

        assert!(f.host.dialogs().is_empty());
        assert_eq!(
            f.channel.scripts(),
            vec![r#"(function (e, id) { done(e, id); })("Could not create dialog", "")"#]
        );
    }

    #[test]
    fn chosen_action_calls_back_once() {
        let f = fixture();
        f.surface
            .handle(
                DispatchRequest::new(NAMESPACE, "dialog")
                    .with_args(r#"{"title":"Delete?","actions":[{"id":"cancel","label":"Keep"},{"id":"ok","label":"Delete"}]}"#)
                    .with_callback("(e, id) => done(e, id)"),
            )
            .expect("handled");
        f.sync();

        let dialogs = f.host.dialogs();
        assert_eq!(dialogs.len(), 1);
        assert_eq!(dialogs[0].title, "Delete?");

        assert!(f.host.choose("ok"));
        assert!(f.host.choose("cancel"));
        f.sync();
        assert_eq!(f.channel.scripts(), vec![r#"((e, id) => done(e, id))("", "ok")"#]);
    }

    #[test]
    fn host_refusing_dialog_reports_failure() {
        let f = fixture_with(FakeHost::refusing_dialogs());
        f.surface
            .handle(
                DispatchRequest::new(NAMESPACE, "dialog")
                    .with_args(r#"{"actions":[{"id":"ok","label":"OK"}]}"#)
                    .with_callback("(e, id) => done(e, id)"),
            )
            .expect("handled");
        f.sync();
        assert_eq!(
            f.channel.scripts(),
            vec![r#"((e, id) => done(e, id))("Could not create dialog", "")"#]
        );
    }

    #[test]
    fn share_passes_message_and_url() {
        let f = fixture();
        f.surface
            .handle_call(r#"platform.share({"message":"Look","url":"https://example.org"})"#)
            .expect("handled");
        f.sync();
        assert_eq!(
            f.host.shares(),
            vec![("Look".to_string(), "https://example.org".to_string())]
        );
        assert!(f.channel.scripts().is_empty());
    }
}
