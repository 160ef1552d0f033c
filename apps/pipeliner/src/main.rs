//! # Pipeliner
//!
//! Command-line front end for `pipeliner-core`.
//!
//! ## Usage
//!
//! ```bash
//! # Run 0..10 through Even (done) then GreaterThan5
//! pipeliner run
//!
//! # Keep going after a match and show every retained result
//! pipeliner run --mode success --track
//!
//! # 10 threads x 10 inputs, verify per-value action counts
//! pipeliner stress --threads 10 --iterations 10
//!
//! # Inspect the pipeline built from a config file
//! pipeliner -c pipeliner.toml stages
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing — PIPELINER_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PIPELINER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "pipeliner=debug,pipeliner_core=debug"
    } else {
        "pipeliner=info,pipeliner_core=warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Pipeliner startup banner.
fn print_banner() {
    println!(
        r#"
  Pipeliner v{}
  Ordered stages • Matcher + Action • Early exit
"#,
        env!("CARGO_PKG_VERSION")
    );
}
