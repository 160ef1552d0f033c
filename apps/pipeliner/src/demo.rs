//! # Demo Pipeline
//!
//! The two-stage integer pipeline used by the CLI:
//!
//! 1. `Even` matches even inputs.
//! 2. `GreaterThan<N>` matches inputs above the configured threshold.
//!
//! Both actions record the input in a shared, mutex-protected hit table so
//! that concurrent runs can be checked for lost or duplicated updates.

use crate::config::{DemoMode, DemoSettings};
use crate::error::AppError;
use pipeliner_core::{ActionResult, Pipeline, PipelineConfig, Stage};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::{Arc, Mutex};

type HitTable = Arc<Mutex<BTreeMap<i64, usize>>>;

/// The demo pipeline plus the side-effect table its actions write to.
pub struct DemoPipeline {
    pipeline: Pipeline<i64>,
    hits: HitTable,
    settings: DemoSettings,
}

impl DemoPipeline {
    /// Build and register both stages.
    pub fn build(settings: DemoSettings, config: PipelineConfig) -> Result<Self, AppError> {
        let pipeline = Pipeline::with_config(config);
        let hits = HitTable::default();

        let reject = settings.reject;
        pipeline.register_stage_last(Stage::new(
            "Even",
            move |i: &i64| {
                if reject == Some(*i) {
                    return Err(format!("input {i} rejected by matcher").into());
                }
                Ok(i % 2 == 0)
            },
            recording_action(&hits, settings.mode, "Even".to_string()),
        ))?;

        let threshold = settings.threshold;
        pipeline.register_stage_last(Stage::new(
            format!("GreaterThan{threshold}"),
            move |i: &i64| Ok(*i > threshold),
            recording_action(&hits, settings.mode, format!("Greater than {threshold}")),
        ))?;

        tracing::debug!(stages = ?pipeline.stage_names(), "demo pipeline ready");

        Ok(Self {
            pipeline,
            hits,
            settings,
        })
    }

    pub fn pipeline(&self) -> &Pipeline<i64> {
        &self.pipeline
    }

    pub fn settings(&self) -> &DemoSettings {
        &self.settings
    }

    /// Execute every input once. A matcher error under the aborting policy
    /// drops that input only; the rest still run.
    ///
    /// Returns the number of aborted inputs.
    pub fn run_inputs(&self, inputs: Range<i64>) -> usize {
        let mut aborted = 0usize;
        for i in inputs {
            if let Err(err) = self.pipeline.execute(&i) {
                tracing::warn!("Input {} aborted: {}", i, err);
                aborted = aborted.saturating_add(1);
            }
        }
        aborted
    }

    /// Snapshot of how many times each input triggered an action.
    pub fn hit_counts(&self) -> BTreeMap<i64, usize> {
        self.hits.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Counts `hit_counts` should hold after every input of `inputs` was
    /// executed `repeats` times.
    pub fn expected_counts(&self, inputs: Range<i64>, repeats: usize) -> BTreeMap<i64, usize> {
        let mut expected = BTreeMap::new();
        for i in inputs {
            if self.settings.reject == Some(i) && self.pipeline.fail_on_matcher_error() {
                continue;
            }
            // A rejected input skips Even under the lenient policy.
            let even = i % 2 == 0 && self.settings.reject != Some(i);
            let above = i > self.settings.threshold;
            let actions = match self.settings.mode {
                DemoMode::Done => usize::from(even || above),
                DemoMode::Success => usize::from(even) + usize::from(above),
            };
            if actions > 0 {
                expected.insert(i, actions.saturating_mul(repeats));
            }
        }
        expected
    }
}

fn recording_action(
    hits: &HitTable,
    mode: DemoMode,
    label: String,
) -> impl Fn(&i64) -> ActionResult<i64> + Send + Sync + 'static {
    let hits = Arc::clone(hits);
    move |i: &i64| {
        *hits
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(*i)
            .or_insert(0) += 1;
        let message = format!("{label}: {i}");
        match mode {
            DemoMode::Done => ActionResult::done(message, *i),
            DemoMode::Success => ActionResult::success(message, *i),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run_all(demo: &DemoPipeline, inputs: Range<i64>) {
        demo.run_inputs(inputs);
    }

    #[test]
    fn done_mode_matches_expected_counts() {
        let demo = DemoPipeline::build(DemoSettings::default(), PipelineConfig::default())
            .expect("build");
        run_all(&demo, 0..10);
        assert_eq!(demo.hit_counts(), demo.expected_counts(0..10, 1));
        assert_eq!(demo.hit_counts().keys().copied().collect::<Vec<_>>(), vec![0, 2, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn success_mode_counts_both_stages() {
        let settings = DemoSettings {
            mode: DemoMode::Success,
            ..DemoSettings::default()
        };
        let demo = DemoPipeline::build(settings, PipelineConfig::default()).expect("build");
        run_all(&demo, 0..10);
        assert_eq!(demo.hit_counts().get(&6), Some(&2));
        assert_eq!(demo.hit_counts(), demo.expected_counts(0..10, 1));
    }

    #[test]
    fn reject_aborts_or_skips() {
        let settings = DemoSettings {
            reject: Some(8),
            ..DemoSettings::default()
        };

        let strict = DemoPipeline::build(settings.clone(), PipelineConfig::default()).expect("build");
        assert!(strict.pipeline().execute(&8).is_err());
        assert!(strict.hit_counts().is_empty());

        let lenient = DemoPipeline::build(
            settings,
            PipelineConfig::default().with_fail_on_matcher_error(false),
        )
        .expect("build");
        let results = lenient.pipeline().execute_with_actions(&8).expect("execute");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].message, "Greater than 5: 8");
        assert_eq!(lenient.hit_counts(), lenient.expected_counts(8..9, 1));
    }

    #[test]
    fn run_inputs_continues_past_rejected_input() {
        let settings = DemoSettings {
            reject: Some(3),
            ..DemoSettings::default()
        };
        let demo = DemoPipeline::build(settings, PipelineConfig::default()).expect("build");

        assert_eq!(demo.run_inputs(0..10), 1);
        assert_eq!(demo.hit_counts(), demo.expected_counts(0..10, 1));
        assert_eq!(demo.hit_counts().get(&9), Some(&1));
    }

    #[test]
    fn capacity_too_small_fails_build() {
        let result = DemoPipeline::build(
            DemoSettings::default(),
            PipelineConfig::default().with_max_stages(1),
        );
        assert!(matches!(result, Err(AppError::Pipeline(_))));
    }
}
