//! # Pipeline Configuration
//!
//! Construction-time settings for a `Pipeline`.
//!
//! `fail_on_matcher_error` can only be chosen here; a built pipeline exposes
//! it read-only. `max_stages` is only the starting capacity and can be
//! changed later with `Pipeline::set_max_stages`.

use serde::{Deserialize, Serialize};

/// Default capacity of a new pipeline.
pub const DEFAULT_MAX_STAGES: usize = 200;

/// Settings used to build a `Pipeline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Initial capacity bound. Zero is legal and rejects every registration.
    pub max_stages: usize,
    /// Abort the whole execution when a matcher fails (`true`), or treat
    /// the failing stage as non-matching and move on (`false`).
    pub fail_on_matcher_error: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_stages: DEFAULT_MAX_STAGES,
            fail_on_matcher_error: true,
        }
    }
}

impl PipelineConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the initial capacity.
    #[must_use]
    pub fn with_max_stages(mut self, max_stages: usize) -> Self {
        self.max_stages = max_stages;
        self
    }

    /// Override the matcher error policy.
    #[must_use]
    pub fn with_fail_on_matcher_error(mut self, fail: bool) -> Self {
        self.fail_on_matcher_error = fail;
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================
