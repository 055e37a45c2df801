//! taskbench Core Library
//!
//! Uniform task lifecycle and performance harness for numerical algorithms.
//! Provides typed task data, the four-phase task state machine, the
//! benchmark runner, configuration parsing and error types.

pub mod buffer;
pub mod config;
pub mod error;
pub mod perf;
pub mod state;
pub mod task;
pub mod task_data;
pub mod types;

#[cfg(test)]
mod mock;

// Re-export commonly used types
pub use buffer::{Buffer, BufferData, Element, ElementType, SharedBuffer};
pub use config::{Config, ConfigLoader, PerfConfig, TaskConfig, TaskKind};
pub use error::{
    BufferError, ConfigError, PerfError, PerfResult, TaskError, TaskResult, TaskbenchError,
    TaskbenchResult,
};
pub use perf::{Perf, PerfAttr, PerfResults, Timer, TypeOfRunning};
pub use state::{TaskState, TaskStateMachine};
pub use task::{Task, TaskImpl};
pub use task_data::TaskData;
pub use types::{RunCount, TaskName};
