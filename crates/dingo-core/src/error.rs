// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Dingo.

use thiserror::Error;

/// Top-level error type for all bridge operations.
///
/// Transport and decode errors (`UnknownMethod`, `Deserialization`,
/// `MalformedCall`) are handled where they occur: the call is logged and
/// dropped. They never reach the script side unless a handler chooses to
/// report them through its own callback.
#[derive(Debug, Error)]
pub enum BridgeError {
    // -- Dispatch errors --
    #[error("unknown bridge method {namespace}.{method}")]
    UnknownMethod { namespace: String, method: String },

    #[error("could not decode arguments for {method}: {detail}")]
    Deserialization { method: String, detail: String },

    #[error("malformed script call: {0}")]
    MalformedCall(String),

    /// Integration mistake: a value outside the JSON contract was encoded,
    /// or the dispatch table was built inconsistently.
    #[error("programming error: {0}")]
    Programming(String),

    // -- Engine / threading --
    #[error("script engine is no longer available")]
    EngineUnavailable,

    #[error("host thread has shut down")]
    HostThreadGone,

    // -- Host capabilities --
    #[error("host bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Configuration --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether this error means the call was dropped before any handler ran.
    pub fn is_dropped_call(&self) -> bool {
        matches!(
            self,
            Self::UnknownMethod { .. }
                | Self::Deserialization { .. }
                | Self::MalformedCall(_)
                | Self::HostThreadGone
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;
