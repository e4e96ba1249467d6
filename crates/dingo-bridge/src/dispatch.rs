// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatch surface: the fixed table of script-invokable entry points.
//
// For every incoming call the surface resolves (namespace, method), decodes
// the JSON arguments with the decoder chosen at registration, wraps the
// optional callback text in a `ValueRef`, and posts the handler body to the
// host thread. Resolution and decode failures are logged and the call is
// dropped; no handler runs and nothing is sent back to the script.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dingo_core::config::is_identifier;
use dingo_core::error::{BridgeError, Result};
use dingo_core::types::{CallId, CallState, MethodId};
use dingo_core::BridgeConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::channel::ScriptChannel;
use crate::marshaller::{HostHandle, Work};
use crate::transformer::Transformer;
use crate::value::{CallbackInvocation, ValueRef, parse_quotes};

/// One script-to-host call as it arrives from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub namespace: String,
    pub method: String,
    /// Raw JSON argument text; `None` when the script passed nothing.
    pub args: Option<String>,
    /// Raw callback text; `None` when the script passed nothing.
    pub callback: Option<String>,
}

impl DispatchRequest {
    pub fn new(namespace: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            method: method.into(),
            args: None,
            callback: None,
        }
    }

    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = Some(args.into());
        self
    }

    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = Some(callback.into());
        self
    }

    pub fn method_id(&self) -> MethodId {
        MethodId::new(&self.namespace, &self.method)
    }
}

/// Everything a handler needs to talk back to the engine. Passed explicitly
/// to every component; cheap to clone.
#[derive(Clone)]
pub struct BridgeContext {
    pub channel: Arc<dyn ScriptChannel>,
    pub transformer: Transformer,
    pub host: HostHandle,
    pub config: Arc<BridgeConfig>,
}

impl BridgeContext {
    pub fn new(config: BridgeConfig, channel: Arc<dyn ScriptChannel>, host: HostHandle) -> Self {
        Self {
            transformer: Transformer::from_config(&config),
            channel,
            host,
            config: Arc::new(config),
        }
    }

    /// Replace the default codec.
    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = transformer;
        self
    }

    /// Classify callback text under the configured policy.
    pub fn value(&self, raw: &str) -> ValueRef {
        ValueRef::parse_with(raw, self.config.callback_policy)
    }

    /// Start building a callback delivery to `target`.
    pub fn invocation<'a>(&self, target: &'a ValueRef) -> CallbackInvocation<'a> {
        CallbackInvocation::new(target, self.transformer.clone())
    }

    /// Submit `invocation` to the engine, logging encoding failures.
    pub fn deliver(&self, invocation: CallbackInvocation<'_>) {
        match invocation.submit(&*self.channel) {
            Ok(true) => {}
            Ok(false) => debug!("callback not invokable; nothing sent"),
            Err(e) => warn!(error = %e, "callback arguments could not be encoded"),
        }
    }
}

/// Turns raw argument text into a handler's argument type.
type Decoder<A> = Box<dyn Fn(&Transformer, Option<&str>, &MethodId) -> Result<A> + Send + Sync>;

/// Handler with its argument type erased.
trait ErasedHandler: Send + Sync {
    fn prepare(
        &self,
        transformer: &Transformer,
        method: &MethodId,
        args: Option<&str>,
        callback: Option<ValueRef>,
    ) -> Result<Work>;
}

struct TypedHandler<A, F> {
    decode: Decoder<A>,
    body: Arc<F>,
}

impl<A, F> ErasedHandler for TypedHandler<A, F>
where
    A: Send + 'static,
    F: Fn(A, Option<ValueRef>) + Send + Sync + 'static,
{
    fn prepare(
        &self,
        transformer: &Transformer,
        method: &MethodId,
        args: Option<&str>,
        callback: Option<ValueRef>,
    ) -> Result<Work> {
        let args = (self.decode)(transformer, args, method)?;
        let body = Arc::clone(&self.body);
        Ok(Box::new(move || body(args, callback)))
    }
}

/// Builder binding (namespace, method) pairs to handlers.
pub struct DispatchSurfaceBuilder {
    ctx: BridgeContext,
    entries: Vec<(MethodId, Box<dyn ErasedHandler>)>,
}

impl DispatchSurfaceBuilder {
    /// Register a handler whose arguments are JSON decoded into `A`.
    ///
    /// An absent payload decodes as `null`, so `A = ()` or `Option<_>` suits
    /// methods that take only a callback.
    pub fn register<A, F>(self, namespace: &str, method: &str, body: F) -> Self
    where
        A: DeserializeOwned + Send + 'static,
        F: Fn(A, Option<ValueRef>) + Send + Sync + 'static,
    {
        self.register_with(
            namespace,
            method,
            |transformer: &Transformer, payload: Option<&str>, id: &MethodId| {
                transformer.decode_payload::<A>(payload, &id.to_string())
            },
            body,
        )
    }

    /// Register a handler that takes one plain string, quoted or not.
    pub fn register_text<F>(self, namespace: &str, method: &str, body: F) -> Self
    where
        F: Fn(String, Option<ValueRef>) + Send + Sync + 'static,
    {
        self.register_with(
            namespace,
            method,
            |_: &Transformer, payload: Option<&str>, _: &MethodId| {
                Ok(payload.map(parse_quotes).unwrap_or_default())
            },
            body,
        )
    }

    /// Register a handler with a custom argument decoder.
    pub fn register_with<A, D, F>(mut self, namespace: &str, method: &str, decode: D, body: F) -> Self
    where
        A: Send + 'static,
        D: Fn(&Transformer, Option<&str>, &MethodId) -> Result<A> + Send + Sync + 'static,
        F: Fn(A, Option<ValueRef>) + Send + Sync + 'static,
    {
        self.entries.push((
            MethodId::new(namespace, method),
            Box::new(TypedHandler {
                decode: Box::new(decode),
                body: Arc::new(body),
            }),
        ));
        self
    }

    /// Freeze the table. Duplicate or non-identifier names are integration
    /// mistakes.
    pub fn build(self) -> Result<DispatchSurface> {
        let mut handlers = HashMap::with_capacity(self.entries.len());
        for (id, handler) in self.entries {
            if !is_identifier(&id.namespace) || !is_identifier(&id.method) {
                return Err(BridgeError::Programming(format!(
                    "{id} is not a valid script identifier pair"
                )));
            }
            if handlers.insert(id.clone(), handler).is_some() {
                return Err(BridgeError::Programming(format!("{id} registered twice")));
            }
        }
        debug!(methods = handlers.len(), "dispatch table built");
        Ok(DispatchSurface {
            ctx: self.ctx,
            handlers,
            stats: Arc::new(Counters::default()),
        })
    }
}

#[derive(Default)]
struct Counters {
    received: AtomicU64,
    dropped: AtomicU64,
    scheduled: AtomicU64,
    completed: AtomicU64,
}

/// Point-in-time call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DispatchStats {
    pub received: u64,
    pub dropped: u64,
    pub scheduled: u64,
    pub completed: u64,
}

/// The frozen dispatch table.
pub struct DispatchSurface {
    ctx: BridgeContext,
    handlers: HashMap<MethodId, Box<dyn ErasedHandler>>,
    stats: Arc<Counters>,
}

impl DispatchSurface {
    pub fn builder(ctx: BridgeContext) -> DispatchSurfaceBuilder {
        DispatchSurfaceBuilder {
            ctx,
            entries: Vec::new(),
        }
    }

    /// Route one call: resolve, decode, capture the callback, and post the
    /// handler body to the host thread.
    ///
    /// `Err` means the call ended in `DroppedOnError`; the error is already
    /// logged and callers may ignore it.
    #[instrument(skip_all, fields(method = %request.method_id()))]
    pub fn handle(&self, request: DispatchRequest) -> Result<CallId> {
        let call_id = CallId::new();
        let id = request.method_id();
        self.stats.received.fetch_add(1, Ordering::Relaxed);
        debug!(%call_id, state = ?CallState::Received);

        let Some(handler) = self.handlers.get(&id) else {
            return Err(self.drop_call(
                call_id,
                BridgeError::UnknownMethod {
                    namespace: request.namespace,
                    method: request.method,
                },
            ));
        };

        let callback = request.callback.as_deref().map(|raw| self.ctx.value(raw));
        let work = match handler.prepare(&self.ctx.transformer, &id, request.args.as_deref(), callback) {
            Ok(work) => work,
            Err(e) => return Err(self.drop_call(call_id, e)),
        };
        debug!(%call_id, state = ?CallState::Decoded);

        let stats = Arc::clone(&self.stats);
        let scheduled = self.ctx.host.schedule(move || {
            debug!(%call_id, state = ?CallState::Executing);
            work();
            stats.completed.fetch_add(1, Ordering::Relaxed);
            debug!(%call_id, state = ?CallState::Completed);
        });
        if let Err(e) = scheduled {
            return Err(self.drop_call(call_id, e));
        }

        self.stats.scheduled.fetch_add(1, Ordering::Relaxed);
        debug!(%call_id, state = ?CallState::Scheduled);
        Ok(call_id)
    }

    /// Parse a `ns.method(args, cb)` line and route it.
    pub fn handle_call(&self, line: &str) -> Result<CallId> {
        match DispatchRequest::parse_call_with(line, self.ctx.config.callback_policy) {
            Ok(request) => self.handle(request),
            Err(e) => {
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Err(self.drop_call(CallId::new(), e))
            }
        }
    }

    fn drop_call(&self, call_id: CallId, error: BridgeError) -> BridgeError {
        self.stats.dropped.fetch_add(1, Ordering::Relaxed);
        warn!(%call_id, state = ?CallState::DroppedOnError, error = %error, "dropping call");
        error
    }

    pub fn contains(&self, namespace: &str, method: &str) -> bool {
        self.handlers.contains_key(&MethodId::new(namespace, method))
    }

    /// Registered entry points, sorted.
    pub fn methods(&self) -> Vec<MethodId> {
        let mut methods: Vec<_> = self.handlers.keys().cloned().collect();
        methods.sort();
        methods
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            received: self.stats.received.load(Ordering::Relaxed),
            dropped: self.stats.dropped.load(Ordering::Relaxed),
            scheduled: self.stats.scheduled.load(Ordering::Relaxed),
            completed: self.stats.completed.load(Ordering::Relaxed),
        }
    }

    pub fn context(&self) -> &BridgeContext {
        &self.ctx
    }

    /// Page-side shim exposing `<object>.<namespace>.<method>(args, cb)`.
    ///
    /// Arguments are JSON-stringified and callbacks passed by source text to
    /// the configured transport function as `(namespace, method, args, cb)`.
    /// A lone function argument is taken as the callback.
    pub fn bootstrap_script(&self) -> String {
        let config = &self.ctx.config;
        let mut script = String::new();
        script.push_str("(function (root) {\n");
        script.push_str(&format!(
            "  var bridge = root.{0} = root.{0} || {{}};\n",
            config.object_name
        ));
        script.push_str("  function call(ns, method, args, cb) {\n");
        script.push_str(
            "    if (typeof args === \"function\" && cb === undefined) { cb = args; args = undefined; }\n",
        );
        script.push_str(&format!(
            "    root.{}(ns, method, args === undefined ? null : JSON.stringify(args), \
             typeof cb === \"function\" ? cb.toString() : null);\n",
            config.transport_function
        ));
        script.push_str("  }\n");

        let mut namespaces: Vec<String> = Vec::new();
        for id in self.methods() {
            if !namespaces.contains(&id.namespace) {
                script.push_str(&format!(
                    "  bridge.{0} = bridge.{0} || {{}};\n",
                    id.namespace
                ));
                namespaces.push(id.namespace.clone());
            }
            script.push_str(&format!(
                "  bridge.{ns}.{m} = function (args, cb) {{ call({ns_q}, {m_q}, args, cb); }};\n",
                ns = id.namespace,
                m = id.method,
                ns_q = quote(&id.namespace),
                m_q = quote(&id.method),
            ));
        }
        script.push_str("})(typeof window !== \"undefined\" ? window : this);\n");
        script
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}
