// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `taskbench validate` command - Validate a suite configuration file.

use std::path::Path;

use taskbench_core::ConfigLoader;

pub fn execute(file: &Path) -> anyhow::Result<()> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Perf Settings:");
            println!("  Iterations:     {}", config.perf.num_running.value());
            println!("  Time Limit:     {}s", config.perf.max_time_sec);
            println!();
            println!("Tasks ({}):", config.tasks.len());
            for task in &config.tasks {
                println!(
                    "  - {} ({}, size: {}, seed: {}, range: [{}, {}])",
                    task.name,
                    task.kind.name(),
                    task.size,
                    task.seed,
                    task.min_value,
                    task.max_value
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
