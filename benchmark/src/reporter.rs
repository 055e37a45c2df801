// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! On-disk store of JSON perf reports.
//!
//! Each report lands in its own `<suite>_<timestamp>.json` file. Files are
//! written next to their final name first and renamed into place, so a
//! listing never sees a half-written report.

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::metrics::BenchmarkReport;

const REPORT_EXTENSION: &str = "json";

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report JSON is invalid: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Directory-backed collection of benchmark reports.
#[derive(Debug, Clone)]
pub struct JsonReporter {
    dir: PathBuf,
}

impl JsonReporter {
    /// Open `dir` as a report store, creating it when missing.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.dir
    }

    /// Write `report` and return the path of the new file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let stem = format!(
            "{}_{}",
            report.benchmark_suite,
            report.timestamp.format("%Y-%m-%dT%H-%M-%S%.3fZ")
        );
        let target = self.dir.join(format!("{}.{}", stem, REPORT_EXTENSION));
        let staging = self.dir.join(format!(".{}.partial", stem));

        write_staged(&staging, &target, report)?;

        tracing::debug!(path = %target.display(), records = report.records.len(), "Report saved");
        Ok(target)
    }

    /// Report files in this store, oldest first.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut paths = fs::read_dir(&self.dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.retain(|p| p.extension().is_some_and(|ext| ext == REPORT_EXTENSION));
        paths.sort();
        Ok(paths)
    }

    /// Most recent report of `suite`, if any.
    pub fn latest(&self, suite: &str) -> Result<Option<BenchmarkReport>, ReporterError> {
        let newest = self
            .list_reports()?
            .into_iter()
            .filter(|p| suite_of(p) == Some(suite))
            .last();

        newest.map(Self::load).transpose()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let reader = BufReader::new(fs::File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Suite name encoded in a report file name; timestamps contain no `_`.
fn suite_of(path: &Path) -> Option<&str> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit_once('_').map(|(suite, _)| suite)
}

/// Serialize `value` to `staging`, then rename it to `target`.
///
/// The staging file is removed when any step fails.
fn write_staged<T: Serialize>(
    staging: &Path,
    target: &Path,
    value: &T,
) -> Result<(), ReporterError> {
    let written = fs::File::create(staging)
        .map_err(ReporterError::from)
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut out, value)?;
            out.flush()?;
            Ok(())
        })
        .and_then(|()| Ok(fs::rename(staging, target)?));

    if written.is_err() {
        let _ = fs::remove_file(staging);
    }
    written
}
