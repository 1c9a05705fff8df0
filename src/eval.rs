// src/eval.rs

//! Run completeness evaluation.
//!
//! Two interchangeable predicates decide whether a run is finished:
//!
//! - [`is_complete_by_aggregate`] reads the per-worker MiniEoR files itself
//!   and requires exactly the expected number of them, all reporting
//!   completion.
//! - [`is_complete_by_delegate`] runs the external completeness calculator
//!   and reads back the MacroEoR verdict it writes.
//!
//! [`Evaluator`] picks one of the two according to configuration.

use std::path::PathBuf;

use globset::{Glob, GlobMatcher};
use tracing::{debug, info, warn};

use crate::calculator::{CalculatorRequest, CompletenessCalculator};
use crate::errors::{EorError, Result};
use crate::fs::FileSystem;
use crate::meta::{read_macro_eor_verdict, read_mini_eor, MetaFilename};
use crate::run::Run;

/// File name pattern of the per-worker end-of-run summaries.
pub const MINI_EOR_PATTERN: &str = "*MiniEoR*.jsn";

fn mini_eor_matcher() -> Result<GlobMatcher> {
    let glob = Glob::new(MINI_EOR_PATTERN).map_err(anyhow::Error::from)?;
    Ok(glob.compile_matcher())
}

/// Decoded MiniEoR files of `run`, sorted by path.
///
/// Names that match the pattern but do not decode as a MiniEoR file of this
/// run are left out.
fn find_mini_eor_files(fs: &dyn FileSystem, run: &Run) -> Result<Vec<MetaFilename>> {
    let matcher = mini_eor_matcher()?;
    let mut paths: Vec<PathBuf> = fs
        .read_dir(&run.path)?
        .into_iter()
        .filter(|p| p.file_name().is_some_and(|n| matcher.is_match(n)))
        .filter(|p| fs.is_file(p))
        .collect();
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match MetaFilename::decode(&path) {
            Ok(name) if !name.is_mini_eor() => {
                debug!(path = ?path, category = %name.category, "not a MiniEoR file");
            }
            Ok(name) if name.run != run.number => {
                warn!(run = run.number, path = ?path, "ignoring MiniEoR file of run {}", name.run);
            }
            Ok(name) => files.push(name),
            Err(e) => debug!(path = ?path, "{}", e),
        }
    }
    Ok(files)
}

/// Complete iff exactly `expected_workers` MiniEoR files exist and each one
/// reports `isRunComplete`.
///
/// A file that cannot be read is dropped, which fails the count. A file that
/// reads but does not parse is an error for the whole run.
pub fn is_complete_by_aggregate(
    fs: &dyn FileSystem,
    run: &Run,
    expected_workers: usize,
) -> Result<bool> {
    let files = find_mini_eor_files(fs, run)?;
    if files.len() != expected_workers {
        info!(
            run = run.number,
            found = files.len(),
            expected = expected_workers,
            "unexpected number of MiniEoR files"
        );
        return Ok(false);
    }

    let mut summaries = Vec::with_capacity(files.len());
    for file in files {
        let path = file.path.clone();
        match read_mini_eor(fs, file) {
            Ok(summary) => summaries.push(summary),
            Err(e @ (EorError::MalformedJson { .. } | EorError::MissingField { .. })) => {
                return Err(e);
            }
            Err(e) => warn!(run = run.number, path = ?path, error = %e, "unreadable MiniEoR file"),
        }
    }
    if summaries.len() != expected_workers {
        return Ok(false);
    }

    let incomplete: Vec<&str> = summaries
        .iter()
        .filter(|s| !s.is_run_complete)
        .map(|s| s.filename.producer.as_str())
        .collect();
    if !incomplete.is_empty() {
        info!(run = run.number, workers = ?incomplete, "workers still merging");
        return Ok(false);
    }

    let events: u64 = summaries.iter().filter_map(|s| s.events).sum();
    debug!(run = run.number, events, "all workers report run complete");
    Ok(true)
}

/// Run the completeness calculator on `run` and return its verdict.
///
/// Any verdict left from an earlier pass is removed first, so only a file
/// written by this invocation counts. The calculator failing, or the verdict
/// file being absent or unreadable afterwards, is a
/// [`EorError::DelegateFailure`]. A verdict file with the wrong shape is
/// `MalformedJson` / `MissingField`.
pub async fn is_complete_by_delegate(
    fs: &dyn FileSystem,
    calculator: &dyn CompletenessCalculator,
    run: &Run,
    debug_level: u32,
    threshold: f64,
) -> Result<bool> {
    let request = CalculatorRequest {
        run: run.number,
        run_dir: run.path.clone(),
        debug_level,
        threshold,
        suffix: run.suffix.clone(),
    };
    let verdict = run.verdict_path();
    fs.remove_file(&verdict)
        .map_err(|e| EorError::DelegateFailure {
            run: run.number,
            reason: format!("could not remove stale verdict file {:?}: {e:#}", verdict),
        })?;

    calculator.calculate(&request).await.map_err(|e| match e {
        e @ EorError::DelegateFailure { .. } => e,
        other => EorError::DelegateFailure {
            run: run.number,
            reason: other.to_string(),
        },
    })?;

    if !fs.is_file(&verdict) {
        return Err(EorError::DelegateFailure {
            run: run.number,
            reason: format!("no verdict file {:?}", verdict),
        });
    }

    match read_macro_eor_verdict(fs, &verdict) {
        Ok(complete) => {
            debug!(run = run.number, complete, "read MacroEoR verdict");
            Ok(complete)
        }
        Err(EorError::Other(e)) => Err(EorError::DelegateFailure {
            run: run.number,
            reason: format!("unreadable verdict file {:?}: {e:#}", verdict),
        }),
        Err(e) => Err(e),
    }
}

/// Completeness predicate selected by configuration.
#[derive(Clone, Copy)]
pub enum Evaluator<'a> {
    Aggregate {
        expected_workers: usize,
    },
    Delegate {
        calculator: &'a dyn CompletenessCalculator,
        debug_level: u32,
        threshold: f64,
    },
}

impl std::fmt::Debug for Evaluator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Evaluator::Aggregate { expected_workers } => f
                .debug_struct("Aggregate")
                .field("expected_workers", expected_workers)
                .finish(),
            Evaluator::Delegate {
                debug_level,
                threshold,
                ..
            } => f
                .debug_struct("Delegate")
                .field("debug_level", debug_level)
                .field("threshold", threshold)
                .finish_non_exhaustive(),
        }
    }
}

impl Evaluator<'_> {
    pub async fn is_complete(&self, fs: &dyn FileSystem, run: &Run) -> Result<bool> {
        match *self {
            Evaluator::Aggregate { expected_workers } => {
                is_complete_by_aggregate(fs, run, expected_workers)
            }
            Evaluator::Delegate {
                calculator,
                debug_level,
                threshold,
            } => is_complete_by_delegate(fs, calculator, run, debug_level, threshold).await,
        }
    }
}
