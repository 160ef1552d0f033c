//! # Action Results
//!
//! The outcome record an action hands back to the pipeline.
//!
//! Two flags are carried and they are independent:
//! - `success` is for the caller. The pipeline never reads it.
//! - `continue_flag` is for the pipeline. `false` halts the current
//!   execution, whatever `success` says.
//!
//! | Helper    | success | continue |
//! |-----------|---------|----------|
//! | `success` | true    | true     |
//! | `done`    | true    | false    |
//! | `error`   | false   | false    |

use crate::StageRef;
use serde::{Deserialize, Serialize};

/// Outcome of one stage action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult<D> {
    /// Stage that produced this result. Filled in by
    /// `Pipeline::execute_with_actions`, `None` otherwise.
    pub stage_of_origin: Option<StageRef>,
    /// Whether the action's work logically succeeded.
    pub success: bool,
    /// Whether the pipeline should evaluate the next stage.
    pub continue_flag: bool,
    /// Human-readable message.
    pub message: String,
    /// Data as reported by the stage.
    pub data: D,
}

impl<D> ActionResult<D> {
    /// Create a result with explicit flags.
    #[must_use]
    pub fn new(success: bool, continue_flag: bool, message: impl Into<String>, data: D) -> Self {
        Self {
            stage_of_origin: None,
            success,
            continue_flag,
            message: message.into(),
            data,
        }
    }

    /// Successful, keep going.
    #[must_use]
    pub fn success(message: impl Into<String>, data: D) -> Self {
        Self::new(true, true, message, data)
    }

    /// Successful, stop here.
    #[must_use]
    pub fn done(message: impl Into<String>, data: D) -> Self {
        Self::new(true, false, message, data)
    }

    /// Failed, stop here.
    #[must_use]
    pub fn error(message: impl Into<String>, data: D) -> Self {
        Self::new(false, false, message, data)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn should_continue(&self) -> bool {
        self.continue_flag
    }

    /// Get the originating stage, if the pipeline recorded it.
    #[must_use]
    pub fn origin(&self) -> Option<&StageRef> {
        self.stage_of_origin.as_ref()
    }

    /// Attach the originating stage.
    #[must_use]
    pub(crate) fn with_origin(mut self, origin: StageRef) -> Self {
        self.stage_of_origin = Some(origin);
        self
    }
}

/// Shorthand for [`ActionResult::success`].
#[must_use]
pub fn success<D>(message: impl Into<String>, data: D) -> ActionResult<D> {
    ActionResult::success(message, data)
}

/// Shorthand for [`ActionResult::done`].
#[must_use]
pub fn done<D>(message: impl Into<String>, data: D) -> ActionResult<D> {
    ActionResult::done(message, data)
}

/// Shorthand for [`ActionResult::error`].
#[must_use]
pub fn error<D>(message: impl Into<String>, data: D) -> ActionResult<D> {
    ActionResult::error(message, data)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StageId;

    #[test]
    fn helper_flags() {
        let s = success("ok", 1);
        assert!(s.is_success() && s.should_continue());

        let d = done("ok", 1);
        assert!(d.is_success() && !d.should_continue());

        let e = error("bad", 1);
        assert!(!e.is_success() && !e.should_continue());
    }

    #[test]
    fn helpers_leave_origin_empty() {
        let r = ActionResult::success("ok", "payload");
        assert!(r.origin().is_none());
        assert_eq!(r.message, "ok");
        assert_eq!(r.data, "payload");
    }

    #[test]
    fn with_origin_sets_stage() {
        let origin = StageRef::new(StageId(3), "Even");
        let r = done("ok", 4).with_origin(origin.clone());
        assert_eq!(r.origin(), Some(&origin));
    }

    #[test]
    fn result_serializes() {
        let r = error("rejected", 9u32);
        let json = serde_json::to_string(&r).expect("serialize");
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"continue_flag\":false"));
        assert!(json.contains("\"data\":9"));
    }
}
