// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! taskbench Benchmark Reports
//!
//! Persistent reports of perf runs, for comparing algorithms and machines
//! over time.
//!
//! # Report Contents
//!
//! - **System**: OS, kernel, CPU model and core count, memory
//! - **Records**: one per task and timing mode, with the full `PerfResults`
//!   and a checksum of the output region
//!
//! # Data Output
//!
//! Reports are written as pretty-printed JSON files named
//! `<suite>_<timestamp>.json`.

pub mod metrics;
pub mod reporter;

pub use metrics::{format_seconds, BenchmarkRecord, BenchmarkReport, SystemInfo};
pub use reporter::{JsonReporter, ReporterError};
