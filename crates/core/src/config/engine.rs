// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration
//!
//! Read from a TOML file. Every key is optional and unknown keys are
//! rejected so typos surface at startup.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Loop settings for the [`Runner`](crate::runner::Runner)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Shortest wall time of one iteration; faster iterations sleep the rest
    #[serde(with = "humantime_serde")]
    pub min_iteration: Duration,
    /// Stop after this many passes
    pub max_passes: Option<u64>,
    /// Stop once sources are exhausted and nothing is queued or scheduled
    pub exit_when_idle: bool,
    /// Write logs here instead of stderr
    pub log_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_iteration: Duration::from_millis(1),
            max_passes: None,
            exit_when_idle: true,
            log_file: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, Path::new("<inline>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
