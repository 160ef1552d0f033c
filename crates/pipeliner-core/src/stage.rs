//! # Stages
//!
//! A stage is a named `(matcher, action)` pair.
//!
//! - The matcher decides whether the stage applies to the current data and
//!   may fail with an opaque caller error.
//! - The action runs only when the matcher said yes. It cannot fail through
//!   an error return; failure is reported with `ActionResult::success`.
//!
//! Both halves are function objects behind `Arc`, so any closure with the
//! right shape works, and a `Stage` clone is cheap. Clones share their
//! [`StageId`], which lets a caller keep a copy of a registered stage and
//! later recognise the results it produced.

use crate::{ActionResult, BoxError, StageId, StageRef};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// FUNCTION-OBJECT TRAITS
// =============================================================================

/// Predicate half of a stage.
///
/// Implemented for every `Fn(&T) -> Result<bool, BoxError>`.
pub trait Matcher<T: ?Sized>: Send + Sync {
    /// Does the stage apply to `data`?
    fn matches(&self, data: &T) -> Result<bool, BoxError>;
}

impl<T: ?Sized, F> Matcher<T> for F
where
    F: Fn(&T) -> Result<bool, BoxError> + Send + Sync,
{
    fn matches(&self, data: &T) -> Result<bool, BoxError> {
        self(data)
    }
}

/// Action half of a stage.
///
/// Implemented for every `Fn(&T) -> ActionResult<D>`.
pub trait Action<T: ?Sized, D>: Send + Sync {
    /// Run the action on `data`.
    fn run(&self, data: &T) -> ActionResult<D>;
}

impl<T: ?Sized, D, F> Action<T, D> for F
where
    F: Fn(&T) -> ActionResult<D> + Send + Sync,
{
    fn run(&self, data: &T) -> ActionResult<D> {
        self(data)
    }
}

// =============================================================================
// STAGE
// =============================================================================

/// A named unit combining a matcher and an action over data of type `T`,
/// reporting data of type `D`.
pub struct Stage<T, D = T> {
    id: StageId,
    name: String,
    matcher: Arc<dyn Matcher<T>>,
    action: Arc<dyn Action<T, D>>,
}

impl<T, D> Stage<T, D> {
    /// Create a stage from two closures.
    ///
    /// No validation happens here. Name uniqueness is checked by the
    /// pipeline at registration time.
    pub fn new<M, A>(name: impl Into<String>, matcher: M, action: A) -> Self
    where
        M: Fn(&T) -> Result<bool, BoxError> + Send + Sync + 'static,
        A: Fn(&T) -> ActionResult<D> + Send + Sync + 'static,
    {
        Self::from_parts(name, Arc::new(matcher), Arc::new(action))
    }

    /// Create a stage from already shared matcher and action objects.
    pub fn from_parts(
        name: impl Into<String>,
        matcher: Arc<dyn Matcher<T>>,
        action: Arc<dyn Action<T, D>>,
    ) -> Self {
        Self {
            id: StageId::next(),
            name: name.into(),
            matcher,
            action,
        }
    }

    /// Get the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the identity token shared by all clones of this stage.
    #[must_use]
    pub fn id(&self) -> StageId {
        self.id
    }

    /// Build the descriptor recorded on results of this stage.
    #[must_use]
    pub fn descriptor(&self) -> StageRef {
        StageRef::new(self.id, self.name.clone())
    }

    /// Evaluate the matcher.
    pub fn matches(&self, data: &T) -> Result<bool, BoxError> {
        self.matcher.matches(data)
    }

    /// Run the action.
    pub fn run(&self, data: &T) -> ActionResult<D> {
        self.action.run(data)
    }
}

impl<T, D> Clone for Stage<T, D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            matcher: Arc::clone(&self.matcher),
            action: Arc::clone(&self.action),
        }
    }
}

impl<T, D> fmt::Debug for Stage<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TESTS
// =============================================================================
