// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event core
//!
//! Lookups on unknown or removed ids are not errors: `off`, `stop_timer` and
//! `remove_timer` report them as `false`.

use std::path::PathBuf;
use thiserror::Error;

/// A handler body failed; recovered by the dispatcher and logged
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct InvocationError {
    pub message: String,
}

impl InvocationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build from a panic payload caught during invocation
    pub(crate) fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::new(format!("handler panicked: {}", detail))
    }
}

/// An event source could not be initialised; fatal before the loop starts
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to open event source {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("event source {name} unavailable: {reason}")]
    Unavailable { name: String, reason: String },
}

/// Timer requests that can never be satisfied
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer delay must be greater than zero")]
    ZeroDelay,
}

/// Errors loading engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
