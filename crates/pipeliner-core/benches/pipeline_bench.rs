//! # Pipeline Benchmarks
//!
//! Performance benchmarks for pipeliner-core registration and execution.
//!
//! Run with: `cargo bench -p pipeliner-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pipeliner_core::{Pipeline, Stage, done, success};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

/// Create a pipeline of `size` stages where stage `n` matches multiples of `n + 1`.
fn create_modulo_pipeline(size: usize) -> Pipeline<u64> {
    let pipeline = Pipeline::new();
    pipeline.set_max_stages(size);

    for n in 0..size {
        let divisor = n as u64 + 1;
        pipeline
            .register_stage_last(Stage::new(
                format!("mod-{divisor}"),
                move |i: &u64| Ok(i % divisor == 0),
                |i: &u64| success("matched", *i),
            ))
            .expect("register");
    }

    pipeline
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");

    for size in [10, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_modulo_pipeline(size)));
        });
    }

    group.finish();
}

fn bench_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute");

    for size in [10, 100, 200].iter() {
        let pipeline = create_modulo_pipeline(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for i in 0..64u64 {
                    let _ = black_box(pipeline.execute(&i));
                }
            });
        });
    }

    group.finish();
}

fn bench_execute_with_actions(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_with_actions");

    for size in [10, 100, 200].iter() {
        let pipeline = create_modulo_pipeline(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(pipeline.execute_with_actions(&720_720)));
        });
    }

    group.finish();
}

fn bench_early_exit(c: &mut Criterion) {
    let pipeline = create_modulo_pipeline(199);
    pipeline.set_max_stages(200);
    pipeline
        .register_stage_first(Stage::new("stop", |_: &u64| Ok(true), |i: &u64| done("stop", *i)))
        .expect("register");

    c.bench_function("early_exit_200", |b| {
        b.iter(|| black_box(pipeline.execute_with_actions(&720_720)));
    });
}

fn bench_concurrent_readers(c: &mut Criterion) {
    let pipeline = Arc::new(create_modulo_pipeline(100));

    c.bench_function("concurrent_readers_4x64", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let pipeline = Arc::clone(&pipeline);
                    thread::spawn(move || {
                        for i in 0..64u64 {
                            let _ = pipeline.execute(&i);
                        }
                    })
                })
                .collect();
            for handle in handles {
                let _ = handle.join();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_registration,
    bench_execute,
    bench_execute_with_actions,
    bench_early_exit,
    bench_concurrent_readers
);
criterion_main!(benches);
