// src/engine/mod.rs

//! Orchestration of run closing.
//!
//! - [`pass`] makes one sweep: scan the input root, evaluate every open run
//!   in range, close the complete ones.
//! - [`runtime`] repeats passes on an interval until Ctrl-C, or makes a single
//!   pass when no interval is configured.
//!
//! No state survives between passes; each one re-reads the filesystem.

pub mod pass;
pub mod runtime;

use std::fmt;
use std::path::Path;

use crate::close::Bookkeeper;
use crate::eval::Evaluator;
use crate::fs::FileSystem;
use crate::run::RunRange;

pub use pass::process_pass;
pub use runtime::run_passes;

/// Everything a pass needs, resolved from configuration.
#[derive(Clone, Copy)]
pub struct PassContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub root: &'a Path,
    pub range: RunRange,
    pub suffix: &'a str,
    pub evaluator: Evaluator<'a>,
    pub bookkeeper: &'a dyn Bookkeeper,
    pub dry_run: bool,
}

impl fmt::Debug for PassContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassContext")
            .field("root", &self.root)
            .field("range", &self.range)
            .field("suffix", &self.suffix)
            .field("evaluator", &self.evaluator)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// What happened to the candidate runs of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Open runs in range found by the scan.
    pub candidates: usize,
    /// Runs this pass closed.
    pub closed: usize,
    /// Runs evaluated as not finished yet (or closed concurrently elsewhere).
    pub incomplete: usize,
    /// Runs whose evaluation or closing failed.
    pub failed: usize,
}
