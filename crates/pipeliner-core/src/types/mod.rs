//! # Core Type Definitions
//!
//! This module contains the shared types of the pipeline:
//! - Stage identity (`StageId`, `StageRef`)
//! - The opaque error carried out of caller matchers (`BoxError`)
//! - Error types (`PipelineError`)

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Opaque error produced by caller-supplied matchers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// =============================================================================
// STAGE IDENTITY
// =============================================================================

static NEXT_STAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity token of a stage.
///
/// Allocated once per `Stage::new` call. Clones of a stage share the token,
/// so a clone kept by the caller identifies the copy held by a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StageId(pub(crate) u64);

impl StageId {
    /// Allocate a fresh, process-unique id.
    #[must_use]
    pub(crate) fn next() -> Self {
        Self(NEXT_STAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Lightweight descriptor of the stage that produced an `ActionResult`.
///
/// This is a copy, not a borrow: it stays valid after the stage has been
/// removed from its pipeline, and never gives access to the stage's closures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageRef {
    /// Identity token of the originating stage.
    pub id: StageId,
    /// Name of the originating stage at execution time.
    pub name: String,
}

impl StageRef {
    /// Create a new descriptor.
    #[must_use]
    pub fn new(id: StageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Get the stage name as a string slice.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for StageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.name, self.id.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors reported by `Pipeline` operations.
///
/// - Structural failures are returned, never panicked
/// - A failed registration or removal leaves the stage list untouched
/// - Matcher errors are passed through with the name of the stage that raised them
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Registration attempted while the pipeline is at capacity.
    #[error("Max stages exceeded (max: {max})")]
    MaxStagesExceeded { max: usize },

    /// Removal of a stage name that is not registered.
    #[error("Stage not found: {0}")]
    StageNotFound(String),

    /// Registration of a name that is already registered.
    #[error("Stage name already exists: {0}")]
    StageNameExists(String),

    /// Positional registration past the end of the stage list.
    #[error("Stage index out of range: {index} (len: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A matcher failed while the pipeline aborts on matcher errors.
    #[error("Matcher of stage '{stage}' failed: {source}")]
    Matcher {
        stage: String,
        #[source]
        source: BoxError,
    },
}

impl PipelineError {
    /// Check if this is one of the structural (registration/removal) failures.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        !matches!(self, PipelineError::Matcher { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
