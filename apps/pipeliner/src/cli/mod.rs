//! # Pipeliner CLI Module
//!
//! ## Available Commands
//!
//! - `run` - Execute the demo pipeline over a range of inputs
//! - `stress` - Execute the demo pipeline from many threads and verify counts
//! - `stages` - Show the registered stages, capacity and policy

mod commands;

use clap::{Parser, Subcommand};
use pipeliner::{AppConfig, AppError, DemoMode};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Pipeliner - sequential rule pipeline demo
///
/// Builds an "Even" stage followed by a "GreaterThan<N>" stage and runs
/// integers through them in order.
#[derive(Parser, Debug)]
#[command(name = "pipeliner")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the pipeline capacity
    #[arg(long, global = true)]
    pub max_stages: Option<usize>,

    /// Treat matcher errors as non-matches instead of aborting
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the demo pipeline over a range of integers
    Run {
        /// First input (inclusive)
        #[arg(short, long, default_value = "0")]
        from: i64,

        /// Last input (exclusive)
        #[arg(short, long, default_value = "10")]
        to: i64,

        /// Whether a matching stage stops the pipeline
        #[arg(short, long, value_enum)]
        mode: Option<DemoMode>,

        /// Threshold of the GreaterThan stage
        #[arg(long)]
        threshold: Option<i64>,

        /// Input on which the Even matcher fails
        #[arg(long)]
        reject: Option<i64>,

        /// Print every retained action result
        #[arg(long)]
        track: bool,
    },

    /// Execute the demo pipeline concurrently and verify action counts
    Stress {
        /// Number of worker threads
        #[arg(long, default_value = "10")]
        threads: usize,

        /// Inputs 0..iterations executed by every thread
        #[arg(long, default_value = "10")]
        iterations: i64,

        /// Whether a matching stage stops the pipeline
        #[arg(short, long, value_enum)]
        mode: Option<DemoMode>,
    },

    /// Show the registered stages
    Stages,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(max_stages) = cli.max_stages {
        config.pipeline.max_stages = max_stages;
    }
    if cli.lenient {
        config.pipeline.fail_on_matcher_error = false;
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Run {
            from,
            to,
            mode,
            threshold,
            reject,
            track,
        }) => {
            if let Some(mode) = mode {
                config.demo.mode = mode;
            }
            if let Some(threshold) = threshold {
                config.demo.threshold = threshold;
            }
            if reject.is_some() {
                config.demo.reject = reject;
            }
            cmd_run(config, json_mode, from..to, track)
        }
        Some(Commands::Stress {
            threads,
            iterations,
            mode,
        }) => {
            if let Some(mode) = mode {
                config.demo.mode = mode;
            }
            cmd_stress(config, json_mode, threads, iterations)
        }
        Some(Commands::Stages) | None => cmd_stages(config, json_mode),
    }
}
