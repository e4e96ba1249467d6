// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core value types for the Dingo bridge.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a single script-to-host call, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub Uuid);

impl CallId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CallId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entry-point identity: a case-sensitive (namespace, method) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId {
    pub namespace: String,
    pub method: String,
}

impl MethodId {
    pub fn new(namespace: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            method: method.into(),
        }
    }
}

impl std::fmt::Display for MethodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.method)
    }
}

/// Lifecycle of one dispatched call.
///
/// `Received → Decoded → Scheduled → Executing → Completed`, or
/// `DroppedOnError` straight from `Received`/`Decoded` when resolution or
/// decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    Received,
    Decoded,
    Scheduled,
    Executing,
    Completed,
    DroppedOnError,
}

impl CallState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::DroppedOnError)
    }
}

/// Minimal description of the host environment, exposed through the script
/// channel for domain bridges that need OS-level facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostContext {
    /// Package / bundle identifier of the embedding application.
    pub app_id: String,
    /// Human-readable version of the embedding application, if known.
    pub app_version: Option<String>,
    /// OS release identifier (e.g. an SDK level or kernel version).
    pub os_version: String,
    /// Device model name.
    pub device_model: String,
}

impl Default for HostContext {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_version: None,
            os_version: std::env::consts::OS.to_string(),
            device_model: std::env::consts::ARCH.to_string(),
        }
    }
}

impl HostContext {
    /// Context describing the running desktop process.
    pub fn current_process(app_id: impl Into<String>, app_version: Option<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_version,
            ..Default::default()
        }
    }
}
