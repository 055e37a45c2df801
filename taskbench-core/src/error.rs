// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for taskbench.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

use crate::buffer::ElementType;
use crate::perf::TypeOfRunning;
use crate::state::TaskState;

/// Top-level error type for taskbench.
#[derive(Debug, Error)]
pub enum TaskbenchError {
    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // =========================================================================
    // Task Data / Lifecycle Errors
    // =========================================================================
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    // =========================================================================
    // Benchmark Errors
    // =========================================================================
    #[error("Perf error: {0}")]
    Perf(#[from] PerfError),
}

/// Errors raised at the typed buffer boundary.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("Element type mismatch: region holds {actual}, requested {expected}")]
    TypeMismatch {
        expected: ElementType,
        actual: ElementType,
    },

    #[error("Declared count {count} exceeds region length {len} for {direction} #{index}")]
    CountExceedsLength {
        direction: &'static str,
        index: usize,
        count: usize,
        len: usize,
    },

    #[error("Buffer lock poisoned")]
    Poisoned,
}

/// Errors returned by lifecycle phases.
///
/// A phase error leaves the task in the failed state for that invocation.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    #[error("Conversion failed during {phase}: {reason}")]
    Conversion {
        phase: &'static str,
        reason: String,
    },

    #[error("Lifecycle order violation: cannot enter {to} from {from}")]
    LifecycleOrder { from: TaskState, to: TaskState },

    #[error("Buffer access failed: {0}")]
    Buffer(#[from] BufferError),
}

impl TaskError {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for a conversion failure in the given phase.
    pub fn conversion(phase: &'static str, reason: impl Into<String>) -> Self {
        Self::Conversion {
            phase,
            reason: reason.into(),
        }
    }
}

/// Errors produced by the benchmark runner.
///
/// Any phase failure aborts the whole benchmark; no partial results exist.
#[derive(Debug, Error)]
pub enum PerfError {
    #[error("{mode} benchmark aborted at iteration {iteration}: {source}")]
    PhaseFailed {
        mode: TypeOfRunning,
        iteration: u64,
        #[source]
        source: TaskError,
    },

    #[error("{mode} benchmark aborted in untimed phase: {source}")]
    UntimedPhaseFailed {
        mode: TypeOfRunning,
        #[source]
        source: TaskError,
    },

    #[error("Timer went backwards at iteration {iteration}: {before} -> {after}")]
    NonMonotonicTimer {
        iteration: u64,
        before: f64,
        after: f64,
    },

    #[error("Task execute time need to be: time < {limit_sec} secs. Original time in secs: {actual_sec}")]
    TimeLimitExceeded { actual_sec: f64, limit_sec: f64 },
}

/// Configuration errors cause the runner to refuse to start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    Parse { message: String },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for lifecycle phases.
pub type TaskResult<T> = Result<T, TaskError>;

/// Result type alias for the benchmark runner.
pub type PerfResult<T> = Result<T, PerfError>;

/// Result type alias using TaskbenchError.
pub type TaskbenchResult<T> = Result<T, TaskbenchError>;
