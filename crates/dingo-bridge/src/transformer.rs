// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON encoding between host types and wire text.
//
// The codec (text <-> JSON tree) is pluggable and object-safe; the typed
// layer on top goes through `serde` so every `Serialize`/`Deserialize` type
// is part of the contract.

use std::sync::Arc;

use dingo_core::BridgeConfig;
use dingo_core::error::{BridgeError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Text form of the JSON wire format.
pub trait JsonCodec: Send + Sync {
    /// Parse wire text into a JSON tree.
    fn parse(&self, text: &str) -> std::result::Result<Value, String>;

    /// Render a JSON tree as text that is also a valid script expression.
    fn render(&self, value: &Value) -> String;
}

/// Codec backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec {
    pub pretty: bool,
}

impl JsonCodec for SerdeJsonCodec {
    fn parse(&self, text: &str) -> std::result::Result<Value, String> {
        serde_json::from_str(text).map_err(|e| e.to_string())
    }

    fn render(&self, value: &Value) -> String {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        // A `Value` always serializes; the fallback is unreachable in practice.
        let text = text.unwrap_or_else(|_| "null".to_string());
        escape_line_terminators(text)
    }
}

/// U+2028/U+2029 are legal inside JSON strings but end a line in older
/// script engines.
fn escape_line_terminators(text: String) -> String {
    if text.contains(['\u{2028}', '\u{2029}']) {
        text.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029")
    } else {
        text
    }
}

/// Typed encode/decode over a shared codec. Cheap to clone.
#[derive(Clone)]
pub struct Transformer {
    codec: Arc<dyn JsonCodec>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(SerdeJsonCodec::default())
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer").finish_non_exhaustive()
    }
}

impl Transformer {
    pub fn new(codec: impl JsonCodec + 'static) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(SerdeJsonCodec {
            pretty: config.pretty_json,
        })
    }

    /// Encode a host value as wire text.
    ///
    /// Fails only for values outside the JSON contract (e.g. maps with
    /// non-string keys), which is an integration mistake.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let tree = serde_json::to_value(value)
            .map_err(|e| BridgeError::Programming(format!("value is not JSON-encodable: {e}")))?;
        Ok(self.codec.render(&tree))
    }

    /// Decode wire text into `T`. `method` only labels the error.
    pub fn decode<T: DeserializeOwned>(&self, text: &str, method: &str) -> Result<T> {
        let tree = self.codec.parse(text).map_err(|detail| BridgeError::Deserialization {
            method: method.to_string(),
            detail,
        })?;
        self.decode_value(tree, method)
    }

    /// Decode an optional payload; an absent payload is JSON `null`.
    pub fn decode_payload<T: DeserializeOwned>(
        &self,
        payload: Option<&str>,
        method: &str,
    ) -> Result<T> {
        match payload {
            Some(text) => self.decode(text, method),
            None => self.decode_value(Value::Null, method),
        }
    }

    fn decode_value<T: DeserializeOwned>(&self, tree: Value, method: &str) -> Result<T> {
        serde_json::from_value(tree).map_err(|e| BridgeError::Deserialization {
            method: method.to_string(),
            detail: e.to_string(),
        })
    }
}
