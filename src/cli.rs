// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::RawConfigFile;
use crate::types::Strategy;

/// Command-line arguments for `eorwatch`.
///
/// Every option that also exists in the config file overrides it.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "eorwatch",
    version,
    about = "Detect finished runs and close them exactly once.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML). Built-in defaults apply without one.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory containing the `run<N>` directories.
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Lowest run number to consider (inclusive).
    #[arg(long, value_name = "N")]
    pub first_run: Option<u64>,

    /// Highest run number to consider (inclusive).
    #[arg(long, value_name = "N")]
    pub last_run: Option<u64>,

    /// How completeness is decided.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<Strategy>,

    /// Completeness calculator program (delegate strategy).
    #[arg(long, value_name = "PROGRAM")]
    pub calculator: Option<String>,

    /// Tell the bookkeeping collaborator not to persist anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Make a single pass even if `poll_interval` is configured.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `[logging].level`, `EORWATCH_LOG` or a default level will
    /// be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    /// Fold command-line overrides into the raw config before validation.
    pub fn apply_to(&self, raw: &mut RawConfigFile) {
        if let Some(ref input) = self.input {
            raw.input.path = input.clone();
        }
        if self.first_run.is_some() {
            raw.runs.first = self.first_run;
        }
        if self.last_run.is_some() {
            raw.runs.last = self.last_run;
        }
        if let Some(strategy) = self.strategy {
            raw.completeness.strategy = strategy;
        }
        if let Some(ref program) = self.calculator {
            raw.completeness.calculator.program = Some(program.clone());
        }
        if self.dry_run {
            raw.general.dry_run = true;
        }
        if self.once {
            raw.general.poll_interval = None;
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
