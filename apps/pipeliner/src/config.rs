//! # Application Configuration
//!
//! Loaded from an optional TOML file, then overridden by command-line flags.
//!
//! ```toml
//! [pipeline]
//! max_stages = 200
//! fail_on_matcher_error = true
//!
//! [demo]
//! threshold = 5
//! mode = "done"      # or "success"
//! reject = 3         # optional: the Even matcher fails on this input
//! ```

use crate::error::AppError;
use pipeliner_core::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the demo actions tell the pipeline after they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DemoMode {
    /// Stop after the first matching stage.
    #[default]
    Done,
    /// Keep evaluating the remaining stages.
    Success,
}

/// Settings of the demonstration pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// The second stage matches inputs strictly greater than this.
    pub threshold: i64,
    pub mode: DemoMode,
    /// Input on which the Even matcher returns an error.
    pub reject: Option<i64>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            threshold: 5,
            mode: DemoMode::Done,
            reject: None,
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub demo: DemoSettings,
}

impl AppConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|e| AppError::ConfigParse(e.to_string()))
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded config from {:?}", path);
        Self::from_toml_str(&text)
    }
}

// =============================================================================
// TESTS
// =============================================================================
