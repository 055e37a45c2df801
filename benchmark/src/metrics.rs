// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Serializable records of perf runs and the host they ran on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use sysinfo::System;
use taskbench_core::{PerfResults, TaskConfig, TaskKind, TypeOfRunning};

/// Format a duration in seconds in human-readable form (auto-selects ns/μs/ms/s).
pub fn format_seconds(secs: f64) -> String {
    let ns = secs * 1e9;
    if ns < 1_000.0 {
        format!("{:.0}ns", ns)
    } else if ns < 1_000_000.0 {
        format!("{:.2}μs", ns / 1_000.0)
    } else if ns < 1_000_000_000.0 {
        format!("{:.2}ms", ns / 1_000_000.0)
    } else {
        format!("{:.2}s", secs)
    }
}

/// Host a report was produced on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    /// Absent on platforms without a kernel version string
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    /// Logical CPUs
    pub cpu_cores: usize,
    pub memory_bytes: u64,
    pub hostname: String,
}

const UNKNOWN: &str = "unknown";

fn or_unknown(value: Option<String>) -> String {
    value.unwrap_or_else(|| UNKNOWN.to_string())
}

impl SystemInfo {
    /// Probe the current host.
    pub fn collect() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu();
        sys.refresh_memory();

        let cpus = sys.cpus();
        Self {
            os: or_unknown(System::name()),
            os_version: or_unknown(System::os_version()),
            kernel_version: System::kernel_version(),
            cpu_model: or_unknown(cpus.first().map(|cpu| cpu.brand().trim().to_string())),
            cpu_cores: cpus.len(),
            memory_bytes: sys.total_memory(),
            hostname: or_unknown(System::host_name()),
        }
    }
}

/// One perf run of one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Task name from the suite configuration
    pub name: String,
    /// Algorithm
    pub kind: TaskKind,
    /// Matrix side or pixel count
    pub size: usize,
    /// Aggregated timing
    pub results: PerfResults,
    /// CRC32 of the output region after the run
    pub output_checksum: u32,
    /// Additional metadata specific to this run
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl BenchmarkRecord {
    /// Create a record for a configured task.
    pub fn new(config: &TaskConfig, results: PerfResults, output_checksum: u32) -> Self {
        Self {
            name: config.name.to_string(),
            kind: config.kind,
            size: config.size,
            results,
            output_checksum,
            metadata: HashMap::new(),
        }
    }

    /// Timed unit of this record.
    pub fn mode(&self) -> TypeOfRunning {
        self.results.type_of_running
    }

    /// Add metadata to the record. Values that fail to serialize are skipped.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), value);
        }
        self
    }
}

/// All records of one `taskbench run`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub benchmark_suite: String,
    /// taskbench version that wrote the report
    pub version: String,
    /// Start of the run
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub records: Vec<BenchmarkRecord>,
}

impl BenchmarkReport {
    /// Empty report for `benchmark_suite`, stamped with the current time.
    pub fn new(benchmark_suite: impl Into<String>) -> Self {
        Self {
            benchmark_suite: benchmark_suite.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            records: Vec::new(),
        }
    }

    /// Add a record to the report.
    pub fn add_record(&mut self, record: BenchmarkRecord) {
        self.records.push(record);
    }

    /// Records of one timing mode.
    pub fn records_for(&self, mode: TypeOfRunning) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records.iter().filter(move |r| r.mode() == mode)
    }

    /// Record of task `name` in `mode`.
    pub fn find(&self, name: &str, mode: TypeOfRunning) -> Option<&BenchmarkRecord> {
        self.records_for(mode).find(|r| r.name == name)
    }
}

impl Default for BenchmarkReport {
    fn default() -> Self {
        Self::new("taskbench")
    }
}
