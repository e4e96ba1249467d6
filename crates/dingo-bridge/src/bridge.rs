// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// NativeBridge: the assembled bridge an embedder wires to its web view.
//
// It owns the dispatch surface with both domain namespaces registered. The
// embedder forwards every engine call-in to `handle` (or `handle_call` for
// the textual form) and injects `bootstrap_script` into each page.

use std::sync::Arc;

use dingo_core::error::Result;
use dingo_core::types::CallId;
use dingo_core::BridgeConfig;
use tracing::{info, instrument};

use crate::channel::ScriptChannel;
use crate::dispatch::{
    BridgeContext, DispatchRequest, DispatchStats, DispatchSurface, DispatchSurfaceBuilder,
};
use crate::marshaller::HostHandle;
use crate::namespaces::{NavigationBarBridge, PlatformBridge};
use crate::traits::HostPlatform;

pub struct NativeBridge {
    surface: DispatchSurface,
    navigation_bar: Arc<NavigationBarBridge>,
    platform: Arc<PlatformBridge>,
}

impl NativeBridge {
    /// Build a bridge exposing `navigationBar` and `platform`.
    pub fn new(
        config: BridgeConfig,
        channel: Arc<dyn ScriptChannel>,
        host: Arc<dyn HostPlatform>,
        host_handle: HostHandle,
    ) -> Result<Self> {
        Self::with_extensions(config, channel, host, host_handle, |builder| builder)
    }

    /// Like [`NativeBridge::new`], letting the embedder register further
    /// namespaces on the same surface.
    #[instrument(skip_all, fields(object = %config.object_name, host = host.platform_name()))]
    pub fn with_extensions(
        config: BridgeConfig,
        channel: Arc<dyn ScriptChannel>,
        host: Arc<dyn HostPlatform>,
        host_handle: HostHandle,
        extend: impl FnOnce(DispatchSurfaceBuilder) -> DispatchSurfaceBuilder,
    ) -> Result<Self> {
        config.validate()?;
        let ctx = BridgeContext::new(config, channel, host_handle);
        let navigation_bar = NavigationBarBridge::new(ctx.clone(), Arc::clone(&host));
        let platform = PlatformBridge::new(ctx.clone(), host);

        let builder = navigation_bar.register(DispatchSurface::builder(ctx));
        let surface = extend(platform.register(builder)).build()?;
        info!(methods = surface.methods().len(), "bridge ready");

        Ok(Self {
            surface,
            navigation_bar,
            platform,
        })
    }

    /// Route one structured call-in. Errors are already logged.
    pub fn handle(&self, request: DispatchRequest) -> Result<CallId> {
        self.surface.handle(request)
    }

    /// Route one `ns.method(args, cb)` call-in. Errors are already logged.
    pub fn handle_call(&self, line: &str) -> Result<CallId> {
        self.surface.handle_call(line)
    }

    pub fn surface(&self) -> &DispatchSurface {
        &self.surface
    }

    pub fn navigation_bar(&self) -> &Arc<NavigationBarBridge> {
        &self.navigation_bar
    }

    pub fn platform(&self) -> &Arc<PlatformBridge> {
        &self.platform
    }

    pub fn stats(&self) -> DispatchStats {
        self.surface.stats()
    }

    /// Script to inject into every page before its own scripts run.
    pub fn bootstrap_script(&self) -> String {
        self.surface.bootstrap_script()
    }
}
