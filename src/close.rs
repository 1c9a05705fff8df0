// src/close.rs

//! Closing runs.
//!
//! Closing writes the empty TransferEoR marker into the run directory and then
//! tells the bookkeeping collaborator. The marker is created with
//! create-exclusive semantics, so racing closers agree on a single winner and
//! only the winner notifies bookkeeping.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::{EorError, Result};
use crate::fs::FileSystem;
use crate::run::Run;

/// What [`close_run`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// This call created the marker.
    Closed,
    /// The marker already existed; nothing was done.
    AlreadyClosed,
}

/// Trait abstracting the bookkeeping side effect of closing a run.
pub trait Bookkeeper: Send + Sync {
    /// Record that `run` has been closed.
    ///
    /// With `dry_run` set the implementation must not persist anything.
    fn run_closed(
        &self,
        run: u64,
        dry_run: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Bookkeeper that only logs. Used when no bookkeeping command is configured.
#[derive(Debug, Clone, Default)]
pub struct LogBookkeeper;

impl Bookkeeper for LogBookkeeper {
    fn run_closed(
        &self,
        run: u64,
        dry_run: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(run, dry_run, "run closed (no bookkeeping command configured)");
            Ok::<(), EorError>(())
        })
    }
}

/// Bookkeeper that runs `<program> [args..] --run <n> [--dry-run]`.
#[derive(Debug, Clone)]
pub struct CommandBookkeeper {
    program: String,
    args: Vec<String>,
}

impl CommandBookkeeper {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    async fn notify(&self, run: u64, dry_run: bool) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).arg("--run").arg(run.to_string());
        if dry_run {
            cmd.arg("--dry-run");
        }
        let status = cmd
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await?;
        if !status.success() {
            return Err(anyhow::anyhow!(
                "bookkeeping command `{}` exited with {}",
                self.program,
                status
            )
            .into());
        }
        Ok(())
    }
}

impl Bookkeeper for CommandBookkeeper {
    fn run_closed(
        &self,
        run: u64,
        dry_run: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(self.notify(run, dry_run))
    }
}

/// Close `run`: create its marker if absent, then notify `bookkeeper`.
///
/// Closing an already closed run is a successful no-op. Failing to create the
/// marker is an error. A bookkeeping failure is logged and does not undo or
/// fail the close.
pub async fn close_run(
    fs: &dyn FileSystem,
    run: &Run,
    bookkeeper: &dyn Bookkeeper,
    dry_run: bool,
) -> Result<CloseOutcome> {
    let marker = run.closed_marker_path();
    if fs.exists(&marker) {
        info!(run = run.number, "run already closed");
        return Ok(CloseOutcome::AlreadyClosed);
    }

    info!(run = run.number, marker = ?marker, "creating closed marker");
    let created = fs
        .create_new(&marker)
        .map_err(|e| EorError::MarkerCreation {
            path: marker.clone(),
            reason: format!("{e:#}"),
        })?;
    if !created {
        info!(run = run.number, "run closed concurrently by another process");
        return Ok(CloseOutcome::AlreadyClosed);
    }

    if let Err(e) = bookkeeper.run_closed(run.number, dry_run).await {
        warn!(run = run.number, error = %e, "bookkeeping notification failed");
    }
    Ok(CloseOutcome::Closed)
}
