// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dingo — bidirectional bridge between native host code and the script
// engine of an embedded web view.
//
// Scripts call `<namespace>.<method>(args, callback)`; the dispatch surface
// decodes the call, runs the handler on the single host thread, and replies
// by executing `callback(...)` back in the engine. Nothing crosses the
// boundary except JSON text and function source.

mod lexer;

pub mod bridge;
pub mod call;
pub mod channel;
pub mod dispatch;
pub mod marshaller;
pub mod namespaces;
pub mod stub;
pub mod traits;
pub mod transformer;
pub mod value;

#[cfg(test)]
mod testing;

use std::sync::Arc;

pub use bridge::NativeBridge;
pub use channel::{EngineChannel, EvalCallback, RecordingChannel, ScriptChannel};
pub use dispatch::{BridgeContext, DispatchRequest, DispatchStats, DispatchSurface, DispatchSurfaceBuilder};
pub use marshaller::{HostHandle, HostThread};
pub use transformer::{JsonCodec, SerdeJsonCodec, Transformer};
pub use value::{CallbackInvocation, ValueRef, parse_quotes};

/// Host used when the embedder supplies none.
///
/// Every capability reports `PlatformUnavailable`; calls still dispatch and
/// callbacks that do not depend on the host (e.g. `platform.info`) still fire.
pub fn host_platform() -> Arc<dyn traits::HostPlatform> {
    Arc::new(stub::StubHost)
}
