// src/engine/pass.rs

use tracing::{error, info, warn};

use crate::close::{close_run, CloseOutcome};
use crate::errors::Result;
use crate::run::{scan_runs, Run};

use super::{PassContext, PassSummary};

#[derive(Debug)]
enum RunOutcome {
    Closed,
    Incomplete,
    AlreadyClosed,
}

/// Sweep the input root once.
///
/// Only a failure to list the root aborts the pass. Any failure while
/// evaluating or closing a single run is logged, counted in
/// [`PassSummary::failed`], and the pass moves on to the next run.
pub async fn process_pass(ctx: &PassContext<'_>) -> Result<PassSummary> {
    info!(path = ?ctx.root, "processing path");
    let runs = scan_runs(ctx.fs, ctx.root, ctx.range, ctx.suffix)?;

    let mut summary = PassSummary {
        candidates: runs.len(),
        ..Default::default()
    };

    for run in &runs {
        match process_run(ctx, run).await {
            Ok(RunOutcome::Closed) => summary.closed += 1,
            Ok(RunOutcome::Incomplete) => {
                warn!(run = run.number, "run is incomplete");
                summary.incomplete += 1;
            }
            Ok(RunOutcome::AlreadyClosed) => summary.incomplete += 1,
            Err(e) => {
                error!(run = run.number, error = %e, "could not evaluate or close run");
                summary.failed += 1;
            }
        }
    }

    info!(path = ?ctx.root, ?summary, "finished processing path");
    Ok(summary)
}

async fn process_run(ctx: &PassContext<'_>, run: &Run) -> Result<RunOutcome> {
    if !ctx.evaluator.is_complete(ctx.fs, run).await? {
        return Ok(RunOutcome::Incomplete);
    }

    info!(run = run.number, "closing run");
    match close_run(ctx.fs, run, ctx.bookkeeper, ctx.dry_run).await? {
        CloseOutcome::Closed => Ok(RunOutcome::Closed),
        CloseOutcome::AlreadyClosed => Ok(RunOutcome::AlreadyClosed),
    }
}
