// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML benchmark-suite configuration with strict schema validation.
//!
//! Validates the suite at start-up time.
//! Any invalid field results in a ConfigError that prevents the run.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::perf::PerfResults;
use crate::types::{RunCount, TaskName};

/// Largest Strassen matrix side accepted from configuration.
const MAX_MATRIX_SIZE: usize = 4096;
/// Largest image accepted from configuration, in pixels.
const MAX_IMAGE_PIXELS: usize = 1 << 28;
/// Pixel values are 8-bit intensities.
const MAX_PIXEL_VALUE: f64 = 255.0;

/// Algorithms a suite can benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Strassen square-matrix multiplication
    Strassen,
    /// Linear histogram stretching of an 8-bit image
    HistogramStretch,
}

impl TaskKind {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Strassen => "strassen",
            Self::HistogramStretch => "histogram_stretch",
        }
    }

    /// Data range used when the configuration does not give one.
    pub const fn default_range(&self) -> (f64, f64) {
        match self {
            Self::Strassen => (-50.0, 50.0),
            Self::HistogramStretch => (0.0, MAX_PIXEL_VALUE),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Raw perf settings as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawPerfConfig {
    #[serde(default = "default_num_running")]
    num_running: u64,
    #[serde(default = "default_max_time_sec")]
    max_time_sec: f64,
}

fn default_num_running() -> u64 {
    5
}

fn default_max_time_sec() -> f64 {
    PerfResults::MAX_TIME_SEC
}

fn default_leaf_size() -> usize {
    64
}

impl Default for RawPerfConfig {
    fn default() -> Self {
        Self {
            num_running: default_num_running(),
            max_time_sec: default_max_time_sec(),
        }
    }
}

/// Raw task entry.
#[derive(Debug, Deserialize)]
struct RawTaskConfig {
    name: String,
    kind: TaskKind,
    size: usize,
    #[serde(default)]
    seed: u64,
    min_value: Option<f64>,
    max_value: Option<f64>,
    #[serde(default = "default_leaf_size")]
    leaf_size: usize,
}

/// Raw root configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    perf: RawPerfConfig,
    tasks: Vec<RawTaskConfig>,
}

/// Validated perf settings.
#[derive(Debug, Clone, Copy)]
pub struct PerfConfig {
    pub num_running: RunCount,
    pub max_time_sec: f64,
}

/// Validated task entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub name: TaskName,
    pub kind: TaskKind,
    /// Matrix side for Strassen, pixel count for histogram stretch
    pub size: usize,
    pub seed: u64,
    pub min_value: f64,
    pub max_value: f64,
    /// Strassen recursion cut-off; ignored by other kinds
    pub leaf_size: usize,
}

/// Complete validated configuration.
#[derive(Debug)]
pub struct Config {
    pub perf: PerfConfig,
    pub tasks: Vec<TaskConfig>,
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> Result<Config, ConfigError> {
        let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            message: format!("YAML parse error: {}", e),
        })?;

        Self::validate(raw)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> Result<Config, ConfigError> {
        let perf = Self::validate_perf(raw.perf)?;

        let mut tasks = Vec::with_capacity(raw.tasks.len());
        let mut seen_names = HashSet::new();

        for (index, raw_task) in raw.tasks.into_iter().enumerate() {
            let task = Self::validate_task(raw_task, index)?;

            if !seen_names.insert(task.name.clone()) {
                return Err(ConfigError::InvalidField {
                    field: "name",
                    value: task.name.to_string(),
                    reason: "Duplicate task name".to_string(),
                });
            }

            tasks.push(task);
        }

        if tasks.is_empty() {
            return Err(ConfigError::InvalidField {
                field: "tasks",
                value: "[]".to_string(),
                reason: "At least one task must be defined".to_string(),
            });
        }

        Ok(Config { perf, tasks })
    }

    fn validate_perf(raw: RawPerfConfig) -> Result<PerfConfig, ConfigError> {
        let num_running = RunCount::new(raw.num_running)?;

        if !(raw.max_time_sec.is_finite() && raw.max_time_sec > 0.0) {
            return Err(ConfigError::InvalidField {
                field: "max_time_sec",
                value: raw.max_time_sec.to_string(),
                reason: "Time limit must be a positive number of seconds".to_string(),
            });
        }

        Ok(PerfConfig {
            num_running,
            max_time_sec: raw.max_time_sec,
        })
    }

    /// Validate a single task entry.
    fn validate_task(raw: RawTaskConfig, index: usize) -> Result<TaskConfig, ConfigError> {
        let context = format!("task at index {}", index);
        let name = TaskName::new(raw.name)?;

        let max_size = match raw.kind {
            TaskKind::Strassen => MAX_MATRIX_SIZE,
            TaskKind::HistogramStretch => MAX_IMAGE_PIXELS,
        };
        if raw.size == 0 || raw.size > max_size {
            return Err(ConfigError::InvalidField {
                field: "size",
                value: raw.size.to_string(),
                reason: format!("Must be between 1 and {} for {} ({})", max_size, raw.kind, context),
            });
        }

        let (default_min, default_max) = raw.kind.default_range();
        let min_value = raw.min_value.unwrap_or(default_min);
        let max_value = raw.max_value.unwrap_or(default_max);

        if !(min_value.is_finite() && max_value.is_finite()) || min_value > max_value {
            return Err(ConfigError::InvalidField {
                field: "min_value",
                value: format!("{}..{}", min_value, max_value),
                reason: format!("Value range must be finite with min <= max ({})", context),
            });
        }

        if raw.kind == TaskKind::HistogramStretch
            && (min_value < 0.0 || max_value > MAX_PIXEL_VALUE)
        {
            return Err(ConfigError::InvalidField {
                field: "max_value",
                value: format!("{}..{}", min_value, max_value),
                reason: format!("Pixel values must lie within 0..=255 ({})", context),
            });
        }

        if raw.leaf_size == 0 {
            return Err(ConfigError::InvalidField {
                field: "leaf_size",
                value: "0".to_string(),
                reason: format!("Leaf size must be at least 1 ({})", context),
            });
        }

        Ok(TaskConfig {
            name,
            kind: raw.kind,
            size: raw.size,
            seed: raw.seed,
            min_value,
            max_value,
            leaf_size: raw.leaf_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CONFIG: &str = r#"
perf:
  num_running: 2
  max_time_sec: 5.0

tasks:
  - name: strassen-128
    kind: strassen
    size: 128
    seed: 7
    min_value: -50
    max_value: 50
  - name: stretch-small
    kind: histogram_stretch
    size: 1000
    min_value: 40
    max_value: 200
"#;

    #[test]
    fn test_valid_config() {
        let config = ConfigLoader::load_string(VALID_CONFIG).unwrap();
        assert_eq!(config.tasks.len(), 2);
        assert_eq!(config.tasks[0].name.as_str(), "strassen-128");
        assert_eq!(config.tasks[0].kind, TaskKind::Strassen);
        assert_eq!(config.tasks[0].seed, 7);
        assert_eq!(config.tasks[1].kind, TaskKind::HistogramStretch);
        assert_eq!(config.perf.num_running.value(), 2);
        assert_eq!(config.perf.max_time_sec, 5.0);
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
tasks:
  - name: mm
    kind: strassen
    size: 4
"#;
        let config = ConfigLoader::load_string(yaml).unwrap();
        assert_eq!(config.perf.num_running.value(), 5);
        assert_eq!(config.perf.max_time_sec, PerfResults::MAX_TIME_SEC);
        assert_eq!(config.tasks[0].seed, 0);
        assert_eq!(config.tasks[0].leaf_size, 64);
        assert_eq!(config.tasks[0].min_value, -50.0);
        assert_eq!(config.tasks[0].max_value, 50.0);
    }

    #[test]
    fn test_missing_tasks() {
        let result = ConfigLoader::load_string("tasks: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_runs_rejected() {
        let yaml = r#"
perf:
  num_running: 0
tasks:
  - name: mm
    kind: strassen
    size: 4
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = r#"
tasks:
  - name: fft
    kind: fourier
    size: 4
"#;
        assert!(matches!(
            ConfigLoader::load_string(yaml),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let yaml = r#"
tasks:
  - name: mm
    kind: strassen
    size: 4
  - name: mm
    kind: strassen
    size: 8
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_zero_size_rejected() {
        let yaml = r#"
tasks:
  - name: mm
    kind: strassen
    size: 0
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let yaml = r#"
tasks:
  - name: mm
    kind: strassen
    size: 4
    min_value: 10
    max_value: -10
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_pixel_range_rejected() {
        let yaml = r#"
tasks:
  - name: img
    kind: histogram_stretch
    size: 64
    max_value: 300
"#;
        assert!(ConfigLoader::load_string(yaml).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ConfigLoader::load_file("/nonexistent/taskbench.yaml"),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("taskbench.yaml");
        std::fs::write(&path, VALID_CONFIG).unwrap();
        let config = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(config.tasks.len(), 2);
    }
}
