// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Script execution channel, the host's only way to run code in the engine.
//
// Execution is fire-and-forget. Scripts submitted from one thread run in
// submission order; there is no ordering between threads, which is why all
// bridge work is funnelled through the host thread first.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dingo_core::BridgeError;
use dingo_core::types::HostContext;
use tracing::debug;

/// Receives the engine's evaluation result as JSON text.
pub type EvalCallback = Box<dyn FnOnce(String) + Send + 'static>;

/// Asynchronous script execution inside the embedded engine.
pub trait ScriptChannel: Send + Sync {
    /// Queue `script` for evaluation and return immediately.
    ///
    /// Once the engine is gone this must be a silent no-op.
    fn execute(&self, script: String, on_result: Option<EvalCallback>);

    /// Host environment facts for domain bridges (app version, device, OS).
    fn host_context(&self) -> &HostContext;

    /// Whether the engine is still attached.
    fn is_available(&self) -> bool {
        true
    }
}

/// Function that hands a script to the real engine (e.g. a web view's
/// `evaluateJavascript`).
pub type Evaluator = dyn Fn(String, Option<EvalCallback>) + Send + Sync;

/// Channel over an embedder-supplied evaluator.
///
/// The embedder calls [`EngineChannel::invalidate`] when the view is torn
/// down; later submissions are dropped.
pub struct EngineChannel {
    evaluator: Arc<Evaluator>,
    context: HostContext,
    attached: AtomicBool,
}

impl EngineChannel {
    pub fn new(
        context: HostContext,
        evaluator: impl Fn(String, Option<EvalCallback>) + Send + Sync + 'static,
    ) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            context,
            attached: AtomicBool::new(true),
        }
    }

    /// Detach from the engine. Idempotent.
    pub fn invalidate(&self) {
        if self.attached.swap(false, Ordering::AcqRel) {
            debug!("script channel detached from engine");
        }
    }
}

impl ScriptChannel for EngineChannel {
    fn execute(&self, script: String, on_result: Option<EvalCallback>) {
        if !self.attached.load(Ordering::Acquire) {
            debug!(error = %BridgeError::EngineUnavailable, "dropping script");
            return;
        }
        (self.evaluator)(script, on_result);
    }

    fn host_context(&self) -> &HostContext {
        &self.context
    }

    fn is_available(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

/// In-memory channel that records every script it is asked to run.
///
/// Used by tests and by embedders that batch scripts themselves.
#[derive(Default)]
pub struct RecordingChannel {
    scripts: Mutex<Vec<String>>,
    context: HostContext,
    eval_result: Mutex<Option<String>>,
    detached: AtomicBool,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: HostContext) -> Self {
        Self {
            context,
            ..Default::default()
        }
    }

    /// Snapshot of recorded scripts, oldest first.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return recorded scripts.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.scripts.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Result handed to evaluation callbacks (`undefined` when unset).
    pub fn set_eval_result(&self, result: Option<String>) {
        *self.eval_result.lock().unwrap_or_else(PoisonError::into_inner) = result;
    }

    pub fn invalidate(&self) {
        self.detached.store(true, Ordering::Release);
    }
}

impl ScriptChannel for RecordingChannel {
    fn execute(&self, script: String, on_result: Option<EvalCallback>) {
        if self.detached.load(Ordering::Acquire) {
            debug!(error = %BridgeError::EngineUnavailable, "dropping script");
            return;
        }
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(script);
        if let Some(on_result) = on_result {
            let result = self
                .eval_result
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
                .unwrap_or_else(|| "undefined".to_string());
            on_result(result);
        }
    }

    fn host_context(&self) -> &HostContext {
        &self.context
    }

    fn is_available(&self) -> bool {
        !self.detached.load(Ordering::Acquire)
    }
}
