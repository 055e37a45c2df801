// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Task state machine with typed state transitions.
//!
//! Implements the task lifecycle: Created → Validated → PreProcessed →
//! RunComplete → PostProcessed, with a failure edge from every phase.
//! Invalid transitions result in `TaskError::LifecycleOrder`.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::TaskError;
use crate::types::TaskName;

/// Task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    /// Bound to its task data, no phase run yet.
    Created,

    /// Task data satisfied the algorithm's preconditions.
    Validated,

    /// Working representation materialized from the input regions.
    PreProcessed,

    /// Core algorithm finished over the working representation.
    RunComplete,

    /// Result written back into the output regions.
    PostProcessed,

    /// A phase reported failure; the current invocation is over.
    Failed,
}

impl TaskState {
    /// Get the state name for error messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Validated => "Validated",
            Self::PreProcessed => "PreProcessed",
            Self::RunComplete => "RunComplete",
            Self::PostProcessed => "PostProcessed",
            Self::Failed => "Failed",
        }
    }

    /// Check if transition to the target state is valid.
    pub fn can_transition_to(&self, target: TaskState) -> bool {
        matches!(
            (self, target),
            // A new invocation starts with validation
            (Self::Created, Self::Validated) |
            (Self::PostProcessed, Self::Validated) |
            (Self::Failed, Self::Validated) |
            // Strict phase order
            (Self::Validated, Self::PreProcessed) |
            (Self::PreProcessed, Self::RunComplete) |
            (Self::RunComplete, Self::PostProcessed) |
            // Any phase may fail
            (_, Self::Failed)
        )
    }

    /// Whether a lifecycle invocation can start from this state.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Created | Self::PostProcessed | Self::Failed)
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// State machine for a task's lifecycle.
/// Enforces valid state transitions and tracks timing metrics.
#[derive(Debug)]
pub struct TaskStateMachine {
    task_name: TaskName,
    current_state: TaskState,
    last_transition: Instant,
    transition_count: u64,
}

impl TaskStateMachine {
    /// Create a new state machine for a task.
    pub fn new(task_name: TaskName) -> Self {
        Self {
            task_name,
            current_state: TaskState::Created,
            last_transition: Instant::now(),
            transition_count: 0,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> TaskState {
        self.current_state
    }

    /// Get the task name.
    pub fn task_name(&self) -> &TaskName {
        &self.task_name
    }

    /// Get time since last transition.
    pub fn time_in_current_state(&self) -> std::time::Duration {
        self.last_transition.elapsed()
    }

    /// Get total number of transitions.
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Check that `target` may be entered without changing state.
    pub fn check_transition(&self, target: TaskState) -> Result<(), TaskError> {
        if !self.current_state.can_transition_to(target) {
            return Err(TaskError::LifecycleOrder {
                from: self.current_state,
                to: target,
            });
        }
        Ok(())
    }

    /// Attempt to transition to a new state.
    /// Returns Ok(()) if successful, or TaskError::LifecycleOrder if invalid.
    pub fn transition_to(&mut self, target: TaskState) -> Result<(), TaskError> {
        self.check_transition(target)?;

        tracing::debug!(
            task = %self.task_name,
            from = self.current_state.name(),
            to = target.name(),
            "State transition"
        );

        self.current_state = target;
        self.last_transition = Instant::now();
        self.transition_count += 1;

        Ok(())
    }

    /// Move to the failed state. Always permitted.
    pub fn fail(&mut self) {
        tracing::debug!(
            task = %self.task_name,
            from = self.current_state.name(),
            "Phase failed"
        );
        self.current_state = TaskState::Failed;
        self.last_transition = Instant::now();
        self.transition_count += 1;
    }
}
