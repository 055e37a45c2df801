// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Lifecycle and runner tests through the public API.
//!
//! Uses a small prefix-sum task to exercise TaskData, Task and Perf together.

use std::sync::Arc;

use taskbench_core::{
    Buffer, Perf, PerfAttr, PerfError, RunCount, Task, TaskData, TaskError, TaskImpl, TaskName,
    TaskResult, TaskState, TypeOfRunning,
};

/// Writes the running sum of an `i32` input into an `i32` output.
struct PrefixSum {
    task_data: Arc<TaskData>,
    input: Vec<i32>,
    output: Vec<i32>,
}

impl PrefixSum {
    fn new(task_data: Arc<TaskData>) -> Self {
        Self {
            task_data,
            input: Vec::new(),
            output: Vec::new(),
        }
    }
}

impl TaskImpl for PrefixSum {
    fn task_data(&self) -> &Arc<TaskData> {
        &self.task_data
    }

    fn validation_impl(&mut self) -> TaskResult<()> {
        let data = &self.task_data;
        if data.inputs_count().len() != 1 || data.outputs_count().len() != 1 {
            return Err(TaskError::validation("expected one input and one output"));
        }
        if data.inputs_count()[0] != data.outputs_count()[0] {
            return Err(TaskError::validation("input and output counts differ"));
        }
        Ok(())
    }

    fn pre_processing_impl(&mut self) -> TaskResult<()> {
        let count = self.task_data.inputs_count()[0];
        self.input = self.task_data.inputs()[0].with(|v: &[i32]| v[..count].to_vec())?;
        self.output = vec![0; count];
        Ok(())
    }

    fn run_impl(&mut self) -> TaskResult<()> {
        let mut acc = 0;
        for (out, x) in self.output.iter_mut().zip(&self.input) {
            acc += x;
            *out = acc;
        }
        Ok(())
    }

    fn post_processing_impl(&mut self) -> TaskResult<()> {
        let count = self.task_data.outputs_count()[0];
        self.task_data.outputs()[0]
            .with_mut(|v: &mut [i32]| v[..count].copy_from_slice(&self.output[..count]))?;
        Ok(())
    }
}

fn name() -> TaskName {
    TaskName::new("prefix-sum").unwrap()
}

#[test]
fn test_lifecycle_writes_through_caller_handle() {
    let out = Buffer::zeroed::<i32>(4);
    let data = TaskData::new()
        .with_input(Buffer::from_vec(vec![1, 2, 3, 4]))
        .unwrap()
        .with_output(Arc::clone(&out))
        .unwrap()
        .shared();

    let mut task = Task::new(name(), PrefixSum::new(data));
    task.validation().unwrap();
    task.pre_processing().unwrap();
    task.run().unwrap();
    task.post_processing().unwrap();

    assert_eq!(out.read::<i32>().unwrap(), vec![1, 3, 6, 10]);
}

#[test]
fn test_malformed_task_data_fails_validation() {
    let data = TaskData::new()
        .with_input(Buffer::from_vec(vec![1, 2, 3]))
        .unwrap()
        .with_output(Buffer::zeroed::<i32>(2))
        .unwrap()
        .shared();

    let mut task = Task::new(name(), PrefixSum::new(data));
    assert!(matches!(task.validation(), Err(TaskError::Validation { .. })));
    assert_eq!(task.state(), TaskState::Failed);
    assert!(task.pre_processing().is_err());
}

#[test]
fn test_wrong_element_type_is_conversion_failure() {
    let data = TaskData::new()
        .with_input(Buffer::from_vec(vec![1.0f64, 2.0]))
        .unwrap()
        .with_output(Buffer::zeroed::<i32>(2))
        .unwrap()
        .shared();

    let mut task = Task::new(name(), PrefixSum::new(data));
    task.validation().unwrap();
    assert!(matches!(task.pre_processing(), Err(TaskError::Buffer(_))));
}

#[test]
fn test_lifecycle_is_deterministic() {
    let input = Buffer::from_vec((0..256).collect::<Vec<i32>>());
    let first = Buffer::zeroed::<i32>(256);
    let second = Buffer::zeroed::<i32>(256);

    for out in [&first, &second] {
        let data = TaskData::new()
            .with_input(Arc::clone(&input))
            .unwrap()
            .with_output(Arc::clone(out))
            .unwrap()
            .shared();
        Task::new(name(), PrefixSum::new(data))
            .run_lifecycle()
            .unwrap();
    }

    assert_eq!(first.checksum().unwrap(), second.checksum().unwrap());
}

#[test]
fn test_pipeline_then_task_run() {
    let out = Buffer::zeroed::<i32>(3);
    let data = TaskData::new()
        .with_input(Buffer::from_vec(vec![5, 5, 5]))
        .unwrap()
        .with_output(Arc::clone(&out))
        .unwrap()
        .shared();
    let mut task = Task::new(name(), PrefixSum::new(data));
    task.run_lifecycle().unwrap();

    let mut attr = PerfAttr::new(RunCount::new(2).unwrap());
    let pipeline = Perf::new(&mut task).pipeline_run(&mut attr).unwrap();
    assert_eq!(pipeline.type_of_running, TypeOfRunning::Pipeline);
    assert_eq!(pipeline.samples_sec.len(), 2);
    assert!(Perf::print_perf_statistic(task.name().as_str(), &pipeline).is_ok());

    let task_run = Perf::new(&mut task).task_run(&mut attr).unwrap();
    assert_eq!(task_run.type_of_running, TypeOfRunning::TaskRun);
    assert_eq!(task_run.samples_sec.len(), 2);
    assert!(task_run.time_sec >= 0.0);

    assert_eq!(out.read::<i32>().unwrap(), vec![5, 10, 15]);
}

#[test]
fn test_benchmark_of_invalid_task_aborts() {
    let data = TaskData::new().shared();
    let mut task = Task::new(name(), PrefixSum::new(data));
    let mut attr = PerfAttr::new(RunCount::new(3).unwrap());

    let err = Perf::new(&mut task).pipeline_run(&mut attr).unwrap_err();
    assert!(matches!(
        err,
        PerfError::PhaseFailed {
            iteration: 0,
            source: TaskError::Validation { .. },
            ..
        }
    ));
}
