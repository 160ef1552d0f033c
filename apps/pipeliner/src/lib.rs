//! # Pipeliner application library
//!
//! Pieces of the `pipeliner` binary that are worth testing on their own:
//! configuration loading, the demo pipeline, and the application error.

pub mod config;
pub mod demo;
pub mod error;

pub use config::{AppConfig, DemoMode, DemoSettings};
pub use demo::DemoPipeline;
pub use error::AppError;
