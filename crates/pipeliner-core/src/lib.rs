//! # pipeliner-core
//!
//! A generic, in-process sequential rule pipeline - THE LOGIC.
//!
//! A [`Pipeline`] holds an ordered list of named [`Stage`]s. Each stage pairs
//! a matcher ("does this stage apply?") with an action ("what to do if it
//! does"). Executing the pipeline walks the stages in registration order and
//! stops at the first action whose [`ActionResult`] says not to continue.
//!
//! ## Example
//!
//! ```rust
//! use pipeliner_core::{Pipeline, Stage, done, success};
//!
//! let pipeline = Pipeline::new();
//! pipeline
//!     .register_stage_last(Stage::new(
//!         "Even",
//!         |i: &i32| Ok(i % 2 == 0),
//!         |i: &i32| done("even", *i),
//!     ))
//!     .expect("register");
//! pipeline
//!     .register_stage_last(Stage::new(
//!         "GreaterThan5",
//!         |i: &i32| Ok(*i > 5),
//!         |i: &i32| success("big", *i),
//!     ))
//!     .expect("register");
//!
//! // 7 is odd, so only GreaterThan5 fires.
//! let results = pipeline.execute_with_actions(&7).expect("execute");
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].origin().map(|s| s.name()), Some("GreaterThan5"));
//!
//! // 8 is even and Even is `done`, so GreaterThan5 never runs.
//! let results = pipeline.execute_with_actions(&8).expect("execute");
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].origin().map(|s| s.name()), Some("Even"));
//! ```
//!
//! ## Architectural Constraints
//!
//! - Passive: no threads or tasks of its own; every call is synchronous
//! - One `RwLock` over the stage list: mutations exclusive, executions shared
//! - Structural failures are [`PipelineError`] values, never panics
//! - No async, no network dependencies

// =============================================================================
// MODULES
// =============================================================================

pub mod action;
pub mod config;
pub mod pipeline;
pub mod stage;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use action::{ActionResult, done, error, success};
pub use config::{DEFAULT_MAX_STAGES, PipelineConfig};
pub use pipeline::Pipeline;
pub use stage::{Action, Matcher, Stage};
pub use types::{BoxError, PipelineError, StageId, StageRef};
