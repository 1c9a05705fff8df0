// src/lib.rs

pub mod calculator;
pub mod cli;
pub mod close;
pub mod config;
pub mod engine;
pub mod errors;
pub mod eval;
pub mod fs;
pub mod logging;
pub mod meta;
pub mod run;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::calculator::{CommandCalculator, CompletenessCalculator};
use crate::cli::CliArgs;
use crate::close::{Bookkeeper, CommandBookkeeper, LogBookkeeper};
use crate::config::{load_or_default, ConfigFile};
use crate::engine::{run_passes, PassContext};
use crate::eval::Evaluator;
use crate::fs::RealFileSystem;
use crate::types::Strategy;

/// Resolve the effective configuration: config file (or defaults), then
/// command-line overrides, then validation.
pub fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = load_or_default(args.config.as_deref())?;
    args.apply_to(&mut raw);
    Ok(ConfigFile::try_from(raw)?)
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the real filesystem
/// - the completeness evaluator selected by `[completeness].strategy`
/// - the bookkeeping collaborator
/// - single-pass or polling execution, with Ctrl-C handling
pub async fn run(cfg: ConfigFile) -> Result<()> {
    let fs = RealFileSystem;

    let calculator: Option<CommandCalculator> = cfg
        .completeness
        .calculator
        .as_ref()
        .map(|c| CommandCalculator::new(&c.program, c.args.clone(), c.timeout));

    let evaluator = match (cfg.completeness.strategy, calculator.as_ref()) {
        (Strategy::Delegate, Some(calculator)) => Evaluator::Delegate {
            calculator: calculator as &dyn CompletenessCalculator,
            debug_level: cfg.completeness.debug_level,
            threshold: cfg.completeness.threshold,
        },
        (Strategy::Delegate, None) => {
            anyhow::bail!("strategy \"delegate\" requires a completeness calculator program")
        }
        (Strategy::Aggregate, _) => Evaluator::Aggregate {
            expected_workers: cfg.completeness.expected_workers,
        },
    };

    let bookkeeper: Box<dyn Bookkeeper> = match cfg.bookkeeping.command {
        Some(ref command) => Box::new(CommandBookkeeper::new(
            command,
            cfg.bookkeeping.args.clone(),
        )),
        None => Box::new(LogBookkeeper),
    };

    let ctx = PassContext {
        fs: &fs,
        root: &cfg.input_path,
        range: cfg.runs,
        suffix: &cfg.marker_suffix,
        evaluator,
        bookkeeper: bookkeeper.as_ref(),
        dry_run: cfg.dry_run,
    };
    debug!(?ctx, "resolved pass context");

    info!("start processing");
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let summary = run_passes(&ctx, cfg.poll_interval, shutdown).await?;
    info!(?summary, "exiting");
    Ok(())
}
