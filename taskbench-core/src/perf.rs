// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark runner for lifecycle tasks.
//!
//! [`Perf`] executes a bound [`Task`] `num_running` times in one of two modes:
//!
//! - **pipeline**: each iteration times Validation → PreProcessing → Run →
//!   PostProcessing as one unit;
//! - **task run**: Validation and PreProcessing happen once, untimed, each
//!   iteration times the Run phase alone, then PostProcessing happens once.
//!
//! The clock is the caller-supplied [`PerfAttr::current_timer`], sampled
//! exactly twice per iteration. A failing phase aborts the whole benchmark
//! with [`PerfError`]; remaining iterations are not executed and no partial
//! results are produced.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{PerfError, PerfResult, TaskResult};
use crate::state::TaskState;
use crate::task::Task;
use crate::types::RunCount;

/// Clock returning elapsed seconds since a caller-fixed start point.
pub type Timer = Box<dyn FnMut() -> f64>;

/// Benchmark configuration.
pub struct PerfAttr {
    /// Number of timed iterations.
    pub num_running: RunCount,
    /// Clock sampled before and after each timed iteration.
    pub current_timer: Timer,
}

impl PerfAttr {
    /// Attributes using a monotonic wall clock started now.
    pub fn new(num_running: RunCount) -> Self {
        let t0 = Instant::now();
        Self {
            num_running,
            current_timer: Box::new(move || t0.elapsed().as_secs_f64()),
        }
    }

    /// Replace the clock, e.g. with a deterministic fake.
    pub fn with_timer(mut self, timer: impl FnMut() -> f64 + 'static) -> Self {
        self.current_timer = Box::new(timer);
        self
    }
}

impl fmt::Debug for PerfAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PerfAttr")
            .field("num_running", &self.num_running)
            .finish_non_exhaustive()
    }
}

/// Which unit a benchmark timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeOfRunning {
    /// Not run yet
    #[default]
    None,
    /// Full four-phase lifecycle per iteration
    Pipeline,
    /// Run phase only per iteration
    TaskRun,
}

impl fmt::Display for TypeOfRunning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeOfRunning::None => write!(f, "none"),
            TypeOfRunning::Pipeline => write!(f, "pipeline"),
            TypeOfRunning::TaskRun => write!(f, "task_run"),
        }
    }
}

/// Aggregated timing of one benchmark.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerfResults {
    /// Timed unit
    pub type_of_running: TypeOfRunning,
    /// Number of timed iterations
    pub num_running: u64,
    /// Mean seconds per iteration
    pub time_sec: f64,
    /// Sum of all iteration times
    pub total_time_sec: f64,
    /// Fastest iteration
    pub min_time_sec: f64,
    /// Slowest iteration
    pub max_time_sec: f64,
    /// Population standard deviation of iteration times
    pub std_dev_sec: f64,
    /// Per-iteration elapsed seconds in execution order
    pub samples_sec: Vec<f64>,
}

impl PerfResults {
    /// Mean time above which a result is reported as a failure.
    pub const MAX_TIME_SEC: f64 = 10.0;

    /// Aggregate per-iteration samples (in seconds).
    pub fn from_samples(type_of_running: TypeOfRunning, samples: Vec<f64>) -> Self {
        if samples.is_empty() {
            return Self {
                type_of_running,
                ..Self::default()
            };
        }

        let len = samples.len() as f64;
        let total_time_sec: f64 = samples.iter().sum();
        let time_sec = total_time_sec / len;
        let min_time_sec = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max_time_sec = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let variance = samples
            .iter()
            .map(|&x| {
                let diff = x - time_sec;
                diff * diff
            })
            .sum::<f64>()
            / len;

        Self {
            type_of_running,
            num_running: samples.len() as u64,
            time_sec,
            total_time_sec,
            min_time_sec,
            max_time_sec,
            std_dev_sec: variance.sqrt(),
            samples_sec: samples,
        }
    }
}

/// Benchmark runner bound to one task.
pub struct Perf<'a> {
    task: &'a mut Task,
}

impl<'a> Perf<'a> {
    pub fn new(task: &'a mut Task) -> Self {
        Self { task }
    }

    /// Time the full lifecycle `num_running` times.
    ///
    /// The task must be idle (created, post-processed or failed) before the
    /// first iteration.
    pub fn pipeline_run(&mut self, attr: &mut PerfAttr) -> PerfResult<PerfResults> {
        let mode = TypeOfRunning::Pipeline;
        tracing::info!(task = %self.task.name(), num_running = %attr.num_running, "Starting pipeline benchmark");

        let task = &mut *self.task;
        let samples = common_run(attr, mode, || task.run_lifecycle())?;

        let results = PerfResults::from_samples(mode, samples);
        tracing::info!(
            task = %self.task.name(),
            mean_sec = results.time_sec,
            total_sec = results.total_time_sec,
            "Pipeline benchmark complete"
        );
        Ok(results)
    }

    /// Time the run phase alone `num_running` times.
    ///
    /// Validation and PreProcessing are performed once first unless the task
    /// is already pre-processed or has completed a run; PostProcessing is performed once after the
    /// last iteration so output regions hold the final result.
    pub fn task_run(&mut self, attr: &mut PerfAttr) -> PerfResult<PerfResults> {
        let mode = TypeOfRunning::TaskRun;
        let untimed = |source| PerfError::UntimedPhaseFailed { mode, source };
        tracing::info!(task = %self.task.name(), num_running = %attr.num_running, "Starting task-run benchmark");

        // A task already past Run keeps its working representation
        let mut first_run = match self.task.state() {
            TaskState::PreProcessed => true,
            TaskState::RunComplete => false,
            _ => {
                self.task.validation().map_err(untimed)?;
                self.task.pre_processing().map_err(untimed)?;
                true
            }
        };

        let task = &mut *self.task;
        let samples = common_run(attr, mode, || {
            if first_run {
                first_run = false;
                task.run()
            } else {
                task.repeat_run()
            }
        })?;

        self.task.post_processing().map_err(untimed)?;

        let results = PerfResults::from_samples(mode, samples);
        tracing::info!(
            task = %self.task.name(),
            mean_sec = results.time_sec,
            total_sec = results.total_time_sec,
            "Task-run benchmark complete"
        );
        Ok(results)
    }

    /// Render `<name>:<mode>:<mean seconds>`; `-1` replaces a mean at or
    /// above `limit_sec`.
    pub fn format_perf_statistic(name: &str, results: &PerfResults, limit_sec: f64) -> String {
        let time_sec = if within_limit(results.time_sec, limit_sec) {
            results.time_sec
        } else {
            -1.0
        };
        format!("{}:{}:{:.10}", name, results.type_of_running, time_sec)
    }

    /// Print the statistic line using [`PerfResults::MAX_TIME_SEC`].
    pub fn print_perf_statistic(name: &str, results: &PerfResults) -> PerfResult<()> {
        Self::print_perf_statistic_with_limit(name, results, PerfResults::MAX_TIME_SEC)
    }

    /// Print the statistic line, failing if the mean reaches `limit_sec`.
    pub fn print_perf_statistic_with_limit(
        name: &str,
        results: &PerfResults,
        limit_sec: f64,
    ) -> PerfResult<()> {
        println!("{}", Self::format_perf_statistic(name, results, limit_sec));

        if !within_limit(results.time_sec, limit_sec) {
            tracing::error!(
                task = name,
                mean_sec = results.time_sec,
                limit_sec,
                "Task exceeded time limit"
            );
            return Err(PerfError::TimeLimitExceeded {
                actual_sec: results.time_sec,
                limit_sec,
            });
        }
        Ok(())
    }
}

/// A NaN or infinite mean never counts as within the limit.
fn within_limit(time_sec: f64, limit_sec: f64) -> bool {
    time_sec.is_finite() && time_sec < limit_sec
}

/// Sample the timer around `num_running` sequential executions of `unit`.
fn common_run<F>(attr: &mut PerfAttr, mode: TypeOfRunning, mut unit: F) -> PerfResult<Vec<f64>>
where
    F: FnMut() -> TaskResult<()>,
{
    let num_running = attr.num_running.value();
    let mut samples = Vec::with_capacity(num_running as usize);

    for iteration in 0..num_running {
        let before = (attr.current_timer)();
        unit().map_err(|source| PerfError::PhaseFailed {
            mode,
            iteration,
            source,
        })?;
        let after = (attr.current_timer)();

        let elapsed = after - before;
        if !(elapsed.is_finite() && elapsed >= 0.0) {
            return Err(PerfError::NonMonotonicTimer {
                iteration,
                before,
                after,
            });
        }
        samples.push(elapsed);
    }

    Ok(samples)
}
