//! # CLI Command Implementations

use pipeliner::{AppConfig, AppError, DemoPipeline};
use pipeliner_core::{ActionResult, PipelineError};
use std::ops::Range;
use std::sync::Arc;
use std::thread;

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    let text =
        serde_json::to_string_pretty(value).map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Outcome of one input in a `run`.
enum RunOutcome {
    Results(Vec<ActionResult<i64>>),
    Aborted(PipelineError),
}

/// Execute the demo pipeline once per input.
pub fn cmd_run(
    config: AppConfig,
    json_mode: bool,
    inputs: Range<i64>,
    track: bool,
) -> Result<(), AppError> {
    if inputs.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "empty input range {}..{}",
            inputs.start, inputs.end
        )));
    }

    let demo = DemoPipeline::build(config.demo, config.pipeline)?;
    tracing::info!(
        "Running {} inputs (mode: {:?})",
        inputs.end.saturating_sub(inputs.start),
        demo.settings().mode
    );

    let mut outcomes = Vec::new();
    for i in inputs {
        // Matcher errors are reported per input, the run goes on.
        let outcome = match demo.pipeline().execute_with_actions(&i) {
            Ok(results) => RunOutcome::Results(results),
            Err(err) => {
                tracing::warn!("Input {} aborted: {}", i, err);
                RunOutcome::Aborted(err)
            }
        };
        outcomes.push((i, outcome));
    }

    if json_mode {
        let runs: Vec<_> = outcomes
            .iter()
            .map(|(input, outcome)| match outcome {
                RunOutcome::Results(results) => serde_json::json!({
                    "input": input,
                    "results": results,
                }),
                RunOutcome::Aborted(err) => serde_json::json!({
                    "input": input,
                    "error": err.to_string(),
                }),
            })
            .collect();
        return print_json(&serde_json::json!({ "runs": runs }));
    }

    for (input, outcome) in &outcomes {
        match outcome {
            RunOutcome::Results(results) => {
                for result in results {
                    if track {
                        println!(
                            "[{}] stage={} success={} continue={} message={:?} data={}",
                            input,
                            result.origin().map(|o| o.name()).unwrap_or("-"),
                            result.success,
                            result.continue_flag,
                            result.message,
                            result.data
                        );
                    } else {
                        println!("{}", result.message);
                    }
                }
            }
            RunOutcome::Aborted(err) => println!("[{}] aborted: {}", input, err),
        }
    }

    Ok(())
}

// =============================================================================
// STRESS COMMAND
// =============================================================================

/// Execute the demo pipeline from `threads` threads and verify the counts.
pub fn cmd_stress(
    config: AppConfig,
    json_mode: bool,
    threads: usize,
    iterations: i64,
) -> Result<(), AppError> {
    if threads == 0 || iterations <= 0 {
        return Err(AppError::InvalidArgument(
            "threads and iterations must be positive".to_string(),
        ));
    }

    let demo = Arc::new(DemoPipeline::build(config.demo, config.pipeline)?);
    tracing::info!("Stressing with {} threads x {} inputs", threads, iterations);

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let demo = Arc::clone(&demo);
            thread::spawn(move || demo.run_inputs(0..iterations))
        })
        .collect();

    let mut aborted = 0usize;
    for handle in handles {
        let worker_aborted = handle
            .join()
            .map_err(|_| AppError::Verification("worker thread panicked".to_string()))?;
        aborted = aborted.saturating_add(worker_aborted);
    }
    if aborted > 0 {
        tracing::info!("{} executions aborted by matcher errors", aborted);
    }

    let actual = demo.hit_counts();
    let expected = demo.expected_counts(0..iterations, threads);
    let ok = actual == expected;

    if json_mode {
        let rows: Vec<_> = expected
            .iter()
            .map(|(value, want)| {
                serde_json::json!({
                    "value": value,
                    "expected": want,
                    "actual": actual.get(value).copied().unwrap_or(0),
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "threads": threads,
            "iterations": iterations,
            "ok": ok,
            "aborted": aborted,
            "counts": rows,
        }))?;
    } else {
        println!("Value  Expected  Actual");
        for (value, want) in &expected {
            println!(
                "{:>5}  {:>8}  {:>6}",
                value,
                want,
                actual.get(value).copied().unwrap_or(0)
            );
        }
    }

    if !ok {
        return Err(AppError::Verification(format!(
            "expected {:?}, got {:?}",
            expected, actual
        )));
    }
    tracing::info!("All counts match");
    Ok(())
}

// =============================================================================
// STAGES COMMAND
// =============================================================================

/// Show the demo pipeline's stages, capacity and matcher policy.
pub fn cmd_stages(config: AppConfig, json_mode: bool) -> Result<(), AppError> {
    let demo = DemoPipeline::build(config.demo, config.pipeline)?;
    let pipeline = demo.pipeline();
    let names = pipeline.stage_names();

    if json_mode {
        return print_json(&serde_json::json!({
            "stages": names,
            "max_stages": pipeline.max_stages(),
            "fail_on_matcher_error": pipeline.fail_on_matcher_error(),
        }));
    }

    println!("Pipeline Stages");
    println!("===============");
    for (index, name) in names.iter().enumerate() {
        println!("{:>3}. {}", index, name);
    }
    println!();
    println!("Capacity:     {}/{}", pipeline.len(), pipeline.max_stages());
    println!(
        "Matcher errs: {}",
        if pipeline.fail_on_matcher_error() {
            "abort"
        } else {
            "skip stage"
        }
    );

    Ok(())
}
