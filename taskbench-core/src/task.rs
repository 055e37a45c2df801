// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Four-phase task lifecycle.
//!
//! Every algorithm implements [`TaskImpl`]: validation, pre-processing, run
//! and post-processing hooks over the [`TaskData`] it was constructed with.
//! [`Task`] drives the hooks in strict order through a [`TaskStateMachine`]:
//! a phase entered out of order fails fast with `TaskError::LifecycleOrder`
//! without invoking the hook, and a hook returning an error moves the task to
//! `Failed` for the rest of that invocation.

use std::sync::Arc;

use crate::error::{TaskError, TaskResult};
use crate::state::{TaskState, TaskStateMachine};
use crate::task_data::TaskData;
use crate::types::TaskName;

/// Algorithm-specific lifecycle hooks.
///
/// Working state (decoded buffers, intermediate results) is private to the
/// implementation. Hooks are only ever called by [`Task`], in order.
pub trait TaskImpl {
    /// The task data this task was constructed with.
    fn task_data(&self) -> &Arc<TaskData>;

    /// Check structural preconditions of the task data.
    ///
    /// Must not mutate working state when it fails.
    fn validation_impl(&mut self) -> TaskResult<()>;

    /// Convert input regions into the working representation.
    fn pre_processing_impl(&mut self) -> TaskResult<()>;

    /// Execute the algorithm over the working representation.
    fn run_impl(&mut self) -> TaskResult<()>;

    /// Write the result back into the output regions.
    fn post_processing_impl(&mut self) -> TaskResult<()>;
}

/// Lifecycle driver around a task implementation.
pub struct Task {
    inner: Box<dyn TaskImpl>,
    state: TaskStateMachine,
}

impl Task {
    /// Bind an implementation under the given name.
    pub fn new(name: TaskName, task: impl TaskImpl + 'static) -> Self {
        Self::from_boxed(name, Box::new(task))
    }

    pub fn from_boxed(name: TaskName, task: Box<dyn TaskImpl>) -> Self {
        Self {
            inner: task,
            state: TaskStateMachine::new(name),
        }
    }

    pub fn name(&self) -> &TaskName {
        self.state.task_name()
    }

    pub fn state(&self) -> TaskState {
        self.state.state()
    }

    pub fn task_data(&self) -> &Arc<TaskData> {
        self.inner.task_data()
    }

    pub fn validation(&mut self) -> TaskResult<()> {
        self.phase(TaskState::Validated, |task| task.validation_impl())
    }

    pub fn pre_processing(&mut self) -> TaskResult<()> {
        self.phase(TaskState::PreProcessed, |task| task.pre_processing_impl())
    }

    pub fn run(&mut self) -> TaskResult<()> {
        self.phase(TaskState::RunComplete, |task| task.run_impl())
    }

    pub fn post_processing(&mut self) -> TaskResult<()> {
        self.phase(TaskState::PostProcessed, |task| task.post_processing_impl())
    }

    /// Run all four phases, stopping at the first failure.
    pub fn run_lifecycle(&mut self) -> TaskResult<()> {
        self.validation()?;
        self.pre_processing()?;
        self.run()?;
        self.post_processing()
    }

    /// Re-execute the run phase over the same working representation.
    ///
    /// Only the task-run benchmark mode does this; it requires `RunComplete`.
    pub(crate) fn repeat_run(&mut self) -> TaskResult<()> {
        let current = self.state.state();
        if current != TaskState::RunComplete {
            return Err(TaskError::LifecycleOrder {
                from: current,
                to: TaskState::RunComplete,
            });
        }
        self.inner.run_impl().inspect_err(|err| {
            tracing::warn!(task = %self.state.task_name(), error = %err, "Repeated run failed");
            self.state.fail();
        })
    }

    fn phase<F>(&mut self, target: TaskState, hook: F) -> TaskResult<()>
    where
        F: FnOnce(&mut dyn TaskImpl) -> TaskResult<()>,
    {
        self.state.check_transition(target)?;

        match hook(self.inner.as_mut()) {
            Ok(()) => self.state.transition_to(target),
            Err(err) => {
                tracing::warn!(
                    task = %self.state.task_name(),
                    phase = target.name(),
                    error = %err,
                    "Lifecycle phase failed"
                );
                self.state.fail();
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", self.name())
            .field("state", &self.state())
            .finish()
    }
}
