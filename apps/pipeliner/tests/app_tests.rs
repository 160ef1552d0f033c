//! Tests for config loading and the demo pipeline through the public app API.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use pipeliner::{AppConfig, AppError, DemoMode, DemoPipeline};
use std::io::Write;
use std::sync::Arc;
use std::thread;

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

// =============================================================================
// CONFIG TESTS
// =============================================================================

#[test]
fn test_load_config_from_file() {
    let file = write_config(
        r#"
        [pipeline]
        max_stages = 8
        fail_on_matcher_error = false

        [demo]
        threshold = 3
        mode = "success"
        "#,
    );

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.pipeline.max_stages, 8);
    assert!(!config.pipeline.fail_on_matcher_error);
    assert_eq!(config.demo.threshold, 3);
    assert_eq!(config.demo.mode, DemoMode::Success);
    assert_eq!(config.demo.reject, None);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let result = AppConfig::load(Some(path.as_path()));
    assert!(matches!(result, Err(AppError::ConfigRead { .. })));
}

#[test]
fn test_load_malformed_file_fails() {
    let file = write_config("[pipeline\nmax_stages = ");
    let result = AppConfig::load(Some(file.path()));
    assert!(matches!(result, Err(AppError::ConfigParse(_))));
}

// =============================================================================
// DEMO PIPELINE TESTS
// =============================================================================

#[test]
fn test_demo_from_config_file() {
    let file = write_config("[demo]\nthreshold = 3\nmode = \"done\"\n");
    let config = AppConfig::load(Some(file.path())).unwrap();
    let demo = DemoPipeline::build(config.demo, config.pipeline).unwrap();

    assert_eq!(demo.pipeline().stage_names(), vec!["Even", "GreaterThan3"]);

    let results = demo.pipeline().execute_with_actions(&5).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].message, "Greater than 3: 5");
    assert!(!results[0].continue_flag);
}

#[test]
fn test_demo_concurrent_counts() {
    let config = AppConfig {
        demo: pipeliner::DemoSettings {
            mode: DemoMode::Success,
            ..Default::default()
        },
        ..Default::default()
    };
    let demo = Arc::new(DemoPipeline::build(config.demo, config.pipeline).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let demo = Arc::clone(&demo);
            thread::spawn(move || {
                for i in 0..10 {
                    demo.pipeline().execute(&i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let counts = demo.hit_counts();
    assert_eq!(counts, demo.expected_counts(0..10, 8));
    assert_eq!(counts.get(&8), Some(&16));
    assert_eq!(counts.get(&7), Some(&8));
    assert_eq!(counts.get(&1), None);
}

#[test]
fn test_demo_concurrent_counts_with_rejected_input() {
    let file = write_config("[demo]\nreject = 3\n");
    let config = AppConfig::load(Some(file.path())).unwrap();
    assert!(config.pipeline.fail_on_matcher_error);
    let demo = Arc::new(DemoPipeline::build(config.demo, config.pipeline).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let demo = Arc::clone(&demo);
            thread::spawn(move || demo.run_inputs(0..10))
        })
        .collect();
    let aborted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(aborted, 8);
    let counts = demo.hit_counts();
    assert_eq!(counts, demo.expected_counts(0..10, 8));
    assert_eq!(counts.get(&3), None);
    assert_eq!(counts.get(&9), Some(&8));
}
