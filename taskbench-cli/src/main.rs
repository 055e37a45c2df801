// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! taskbench CLI
//!
//! Command-line interface for running benchmark suites.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use taskbench_core::TypeOfRunning;

mod commands;

/// taskbench - Validate, run and time numerical tasks
#[derive(Parser)]
#[command(name = "taskbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Suite configuration file path
    #[arg(short, long, default_value = "taskbench.yaml")]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every task of the suite and print perf statistics
    Run {
        /// Timed unit
        #[arg(short, long, value_enum, default_value_t = Mode::Both)]
        mode: Mode,

        /// Directory to save a JSON report into
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Only run the named tasks
        #[arg(short, long)]
        task: Vec<String>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },
}

/// Benchmark modes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Time the whole four-phase lifecycle
    Pipeline,
    /// Time the run phase alone
    TaskRun,
    /// Pipeline first, then task run
    Both,
}

impl Mode {
    pub fn runs(self) -> &'static [TypeOfRunning] {
        match self {
            Mode::Pipeline => &[TypeOfRunning::Pipeline],
            Mode::TaskRun => &[TypeOfRunning::TaskRun],
            Mode::Both => &[TypeOfRunning::Pipeline, TypeOfRunning::TaskRun],
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { mode, report, task } => {
            commands::run::execute(&cli.config, mode, report.as_deref(), &task)
        }
        Commands::Validate { file } => commands::validate::execute(&file),
    }
}
