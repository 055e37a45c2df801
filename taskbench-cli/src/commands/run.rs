// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `taskbench run` command - Run the suite and print perf statistics.

use std::path::Path;

use taskbench_benchmark::{format_seconds, BenchmarkRecord, BenchmarkReport, JsonReporter};
use taskbench_core::{ConfigLoader, Perf, PerfAttr, TypeOfRunning};
use taskbench_tasks::build_task;

use crate::Mode;

pub fn execute(
    config_path: &Path,
    mode: Mode,
    report_dir: Option<&Path>,
    only: &[String],
) -> anyhow::Result<()> {
    tracing::info!(config = %config_path.display(), "Loading suite");
    let config = ConfigLoader::load_file(config_path)?;

    let selected: Vec<_> = config
        .tasks
        .iter()
        .filter(|t| only.is_empty() || only.iter().any(|name| name == t.name.as_str()))
        .collect();
    if selected.is_empty() {
        anyhow::bail!("No task matches {:?}", only);
    }

    let mut report = BenchmarkReport::new("taskbench");
    let mut over_limit = 0usize;

    for task_config in selected {
        let name = task_config.name.as_str();
        let mut prepared = build_task(task_config)?;

        // Correctness pass through the lifecycle before any timing
        prepared.task.run_lifecycle()?;
        let reference = prepared.output.checksum()?;
        tracing::info!(task = name, checksum = format!("{:08x}", reference), "Lifecycle passed");

        for &run in mode.runs() {
            let mut attr = PerfAttr::new(config.perf.num_running);
            let results = {
                let mut perf = Perf::new(&mut prepared.task);
                match run {
                    TypeOfRunning::TaskRun => perf.task_run(&mut attr)?,
                    _ => perf.pipeline_run(&mut attr)?,
                }
            };

            let checksum = prepared.output.checksum()?;
            if checksum != reference {
                tracing::warn!(
                    task = name,
                    mode = %run,
                    expected = format!("{:08x}", reference),
                    actual = format!("{:08x}", checksum),
                    "Output differs from the correctness pass"
                );
            }

            if let Err(err) =
                Perf::print_perf_statistic_with_limit(name, &results, config.perf.max_time_sec)
            {
                tracing::error!(task = name, mode = %run, error = %err, "Time limit exceeded");
                over_limit += 1;
            }
            println!(
                "  mean {}  min {}  max {}  runs {}  checksum {:08x}",
                format_seconds(results.time_sec),
                format_seconds(results.min_time_sec),
                format_seconds(results.max_time_sec),
                results.num_running,
                checksum
            );

            report.add_record(
                BenchmarkRecord::new(task_config, results, checksum)
                    .with_metadata("seed", task_config.seed)
                    .with_metadata("leaf_size", task_config.leaf_size),
            );
        }
    }

    if let Some(dir) = report_dir {
        let store = JsonReporter::new(dir)?;
        if let Some(previous) = store.latest(&report.benchmark_suite)? {
            print_comparison(&previous, &report);
        }
        let path = store.save(&report)?;
        println!();
        println!("Benchmark report saved to: {}", path.display());
    }

    if over_limit > 0 {
        anyhow::bail!(
            "{} benchmark(s) exceeded the {}s time limit",
            over_limit,
            config.perf.max_time_sec
        );
    }

    Ok(())
}

/// Print mean-time changes against the previous report of the suite.
fn print_comparison(previous: &BenchmarkReport, current: &BenchmarkReport) {
    println!();
    println!("Compared with {}:", previous.timestamp.format("%Y-%m-%d %H:%M:%S"));
    for record in &current.records {
        let Some(before) = previous.find(&record.name, record.mode()) else {
            continue;
        };
        let (old, new) = (before.results.time_sec, record.results.time_sec);
        let change = if old > 0.0 { (new - old) / old * 100.0 } else { 0.0 };
        println!(
            "  {} [{}]: {} -> {} ({:+.1}%)",
            record.name,
            record.mode(),
            format_seconds(old),
            format_seconds(new),
            change
        );
    }
}
