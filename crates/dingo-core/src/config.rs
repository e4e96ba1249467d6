// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BridgeError, Result};

/// Which callback texts count as invokable function references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackPolicy {
    /// Only function expressions and arrow functions.
    #[default]
    FunctionExpressions,
    /// Function expressions plus dotted identifier paths (`window.app.onTap`).
    NamedFunctions,
}

/// Settings shared by every bridge component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Global object the bootstrap shim installs in the page (`window.<name>`).
    pub object_name: String,
    /// Engine-side function that carries calls into the host.
    pub transport_function: String,
    /// Name given to the designated host thread.
    pub host_thread_name: String,
    /// Which callback texts are treated as functions.
    pub callback_policy: CallbackPolicy,
    /// Emit indented JSON in generated scripts.
    pub pretty_json: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            object_name: "NativeBridge".into(),
            transport_function: "__dingoPost".into(),
            host_thread_name: "dingo-host".into(),
            callback_policy: CallbackPolicy::FunctionExpressions,
            pretty_json: false,
        }
    }
}

impl BridgeConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        debug!(path = %path.display(), "bridge config loaded");
        Ok(config)
    }

    /// Like [`BridgeConfig::load`], but falls back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "using default bridge config");
                Self::default()
            }
        }
    }

    /// Persist as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BridgeError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Names end up spliced into generated script, so they must be plain
    /// identifiers.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("object_name", &self.object_name),
            ("transport_function", &self.transport_function),
        ] {
            if !is_identifier(value) {
                return Err(BridgeError::Config(format!(
                    "{field} must be a script identifier, got {value:?}"
                )));
            }
        }
        if self.host_thread_name.is_empty() {
            return Err(BridgeError::Config("host_thread_name is empty".into()));
        }
        Ok(())
    }
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
