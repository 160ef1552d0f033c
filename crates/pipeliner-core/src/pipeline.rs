//! # Pipeline
//!
//! An ordered list of stages run against one data value at a time.
//!
//! ## Execution
//!
//! For each stage, in list order:
//! 1. Evaluate the matcher. A matcher error either aborts the whole call
//!    (default policy) or makes the stage count as non-matching.
//! 2. On a match, run the action.
//! 3. If the result says `continue_flag == false`, stop. This is not an error.
//!
//! Every stage sees the same input. `ActionResult::data` goes back to the
//! caller only and is never fed into the next stage.
//!
//! ## Locking
//!
//! The stage list sits behind a single `RwLock`:
//!
//! | Operation                                            | Lock      | Held for             |
//! |------------------------------------------------------|-----------|----------------------|
//! | `register_stage_*`, `remove_stage`, `set_max_stages` | exclusive | the whole call       |
//! | `execute`, `execute_with_actions`                    | shared    | the whole stage loop |
//! | inspection (`len`, `stage_names`, ...)               | shared    | the whole call       |
//!
//! Executions run in parallel with each other but never with a mutation.
//! A long-running matcher or action therefore blocks pending writers.
//!
//! A matcher or action must not call *any* method on the pipeline that is
//! running it. Mutations deadlock outright. Inspection calls take a second
//! shared guard, which blocks forever once another thread is waiting to
//! write, since the standard library lock may prefer writers. Capture what
//! a closure needs (a `stage_names()` snapshot, a count) before the stage
//! is registered.

use crate::{ActionResult, PipelineConfig, PipelineError, Stage};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Where a new stage goes in the list.
#[derive(Debug, Clone, Copy)]
enum Placement {
    First,
    Last,
    At(usize),
}

/// Mutable state guarded by the pipeline lock.
struct PipelineInner<T, D> {
    stages: Vec<Stage<T, D>>,
    max_stages: usize,
}

impl<T, D> PipelineInner<T, D> {
    /// Capacity first, then name uniqueness.
    fn can_add_stage(&self, stage: &Stage<T, D>) -> Result<(), PipelineError> {
        if self.stages.len() >= self.max_stages {
            return Err(PipelineError::MaxStagesExceeded {
                max: self.max_stages,
            });
        }
        if self.position(stage.name()).is_some() {
            return Err(PipelineError::StageNameExists(stage.name().to_string()));
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name() == name)
    }
}

/// A sequential rule pipeline over data of type `T`, whose actions report
/// data of type `D`.
///
/// `Pipeline` is `Send + Sync` and is meant to be shared through `Arc`
/// between threads that register and execute. Its own matchers and actions
/// must not call back into it; see the module docs.
pub struct Pipeline<T, D = T> {
    inner: RwLock<PipelineInner<T, D>>,
    fail_on_matcher_error: bool,
}

impl<T, D> Default for Pipeline<T, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D> Pipeline<T, D> {
    /// Create an empty pipeline with capacity 200 that aborts on matcher errors.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create an empty pipeline from explicit settings.
    #[must_use]
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            inner: RwLock::new(PipelineInner {
                stages: Vec::new(),
                max_stages: config.max_stages,
            }),
            fail_on_matcher_error: config.fail_on_matcher_error,
        }
    }

    // Poisoning only means a caller closure panicked while a guard was
    // alive. Every mutation is a single Vec operation, so the list is intact.
    fn read(&self) -> RwLockReadGuard<'_, PipelineInner<T, D>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PipelineInner<T, D>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    // =========================================================================
    // CAPACITY & POLICY
    // =========================================================================

    /// Update the capacity bound.
    ///
    /// Lowering it below the current stage count evicts nothing; further
    /// registrations fail with `MaxStagesExceeded` until enough stages are
    /// removed.
    pub fn set_max_stages(&self, max_stages: usize) {
        let mut inner = self.write();
        tracing::debug!(
            from = inner.max_stages,
            to = max_stages,
            stages = inner.stages.len(),
            "pipeline capacity changed"
        );
        inner.max_stages = max_stages;
    }

    /// Get the current capacity bound.
    ///
    /// Takes the shared guard; not callable from this pipeline's own stages.
    #[must_use]
    pub fn max_stages(&self) -> usize {
        self.read().max_stages
    }

    /// Whether a matcher error aborts execution. Fixed at construction.
    #[must_use]
    pub fn fail_on_matcher_error(&self) -> bool {
        self.fail_on_matcher_error
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Append a stage; it becomes the last one evaluated.
    pub fn register_stage_last(&self, stage: Stage<T, D>) -> Result<(), PipelineError> {
        self.register(Placement::Last, stage)
    }

    /// Prepend a stage; it becomes the first one evaluated.
    pub fn register_stage_first(&self, stage: Stage<T, D>) -> Result<(), PipelineError> {
        self.register(Placement::First, stage)
    }

    /// Insert a stage at `index`, shifting later stages right.
    ///
    /// `index == len` appends. Anything past that fails with
    /// `IndexOutOfRange` and leaves the list untouched.
    pub fn register_stage_at(&self, index: usize, stage: Stage<T, D>) -> Result<(), PipelineError> {
        self.register(Placement::At(index), stage)
    }

    fn register(&self, placement: Placement, stage: Stage<T, D>) -> Result<(), PipelineError> {
        // The check and the insert share one write guard, so two racing
        // registrations cannot both pass it.
        let mut inner = self.write();
        inner.can_add_stage(&stage)?;

        let len = inner.stages.len();
        let index = match placement {
            Placement::First => 0,
            Placement::Last => len,
            Placement::At(index) if index <= len => index,
            Placement::At(index) => return Err(PipelineError::IndexOutOfRange { index, len }),
        };

        tracing::debug!(stage = stage.name(), index, "stage registered");
        inner.stages.insert(index, stage);
        Ok(())
    }

    /// Remove the stage called `name`, keeping the order of the others.
    pub fn remove_stage(&self, name: &str) -> Result<(), PipelineError> {
        let mut inner = self.write();
        let index = inner
            .position(name)
            .ok_or_else(|| PipelineError::StageNotFound(name.to_string()))?;
        inner.stages.remove(index);
        tracing::debug!(stage = name, index, "stage removed");
        Ok(())
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================
    //
    // Each of these takes the shared guard. Calling one from a matcher or
    // action of this pipeline can deadlock behind a waiting writer.

    /// Number of registered stages.
    ///
    /// Takes the shared guard; not callable from this pipeline's own stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().stages.is_empty()
    }

    #[must_use]
    pub fn contains_stage(&self, name: &str) -> bool {
        self.read().position(name).is_some()
    }

    /// Position of `name` in evaluation order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.read().position(name)
    }

    /// Stage names in evaluation order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<String> {
        self.read()
            .stages
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    // =========================================================================
    // EXECUTION
    // =========================================================================

    /// Run the pipeline on `data`, discarding per-stage results.
    ///
    /// Returns the matcher error that aborted the run, if any.
    pub fn execute(&self, data: &T) -> Result<(), PipelineError> {
        self.run(data, false).map(|_| ())
    }

    /// Run the pipeline on `data` and return one result per stage that
    /// matched and ran, in evaluation order, each tagged with its stage.
    ///
    /// A matcher error under the aborting policy returns the error and no
    /// results at all.
    pub fn execute_with_actions(&self, data: &T) -> Result<Vec<ActionResult<D>>, PipelineError> {
        self.run(data, true)
    }

    fn run(&self, data: &T, keep_results: bool) -> Result<Vec<ActionResult<D>>, PipelineError> {
        let inner = self.read();
        let mut results = Vec::new();

        for stage in &inner.stages {
            let matched = match stage.matches(data) {
                Ok(matched) => matched,
                Err(source) if self.fail_on_matcher_error => {
                    tracing::debug!(stage = stage.name(), error = %source, "matcher failed, aborting");
                    return Err(PipelineError::Matcher {
                        stage: stage.name().to_string(),
                        source,
                    });
                }
                Err(source) => {
                    tracing::warn!(stage = stage.name(), error = %source, "matcher failed, skipping stage");
                    continue;
                }
            };
            if !matched {
                continue;
            }

            let result = stage.run(data);
            tracing::trace!(
                stage = stage.name(),
                success = result.success,
                continue_flag = result.continue_flag,
                "stage action ran"
            );
            let halt = !result.continue_flag;
            if keep_results {
                results.push(result.with_origin(stage.descriptor()));
            }
            if halt {
                tracing::trace!(stage = stage.name(), "pipeline stopped early");
                break;
            }
        }

        Ok(results)
    }
}

impl<T, D> std::fmt::Debug for Pipeline<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("Pipeline")
            .field("stages", &inner.stages)
            .field("max_stages", &inner.max_stages)
            .field("fail_on_matcher_error", &self.fail_on_matcher_error)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
