// src/run/scanner.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{EorError, Result};
use crate::fs::FileSystem;

use super::{Run, RunRange};

/// List the open runs under `root` that fall inside `range`.
///
/// Directories are visited in lexicographic name order. Entries whose name
/// does not follow the `run<N>` grammar are skipped; failing to list `root`
/// itself is an error.
pub fn scan_runs(
    fs: &dyn FileSystem,
    root: &Path,
    range: RunRange,
    suffix: &str,
) -> Result<Vec<Run>> {
    let mut dirs: Vec<PathBuf> = fs
        .read_dir(root)?
        .into_iter()
        .filter(|p| fs.is_dir(p))
        .collect();
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut runs = Vec::new();
    for dir in dirs {
        debug!(path = ?dir, "inspecting directory");

        let run = match Run::from_path(&dir, suffix) {
            Ok(run) => run,
            Err(EorError::NotARunDirectory(name)) => {
                debug!(%name, "skipping, not a run directory");
                continue;
            }
            Err(e) => return Err(e),
        };

        if !range.contains(run.number) {
            debug!(run = run.number, ?range, "skipping run outside of the range");
            continue;
        }
        if run.is_closed(fs) {
            debug!(run = run.number, "skipping run, already closed");
            continue;
        }

        debug!(run = run.number, "adding run to the processing");
        runs.push(run);
    }

    Ok(runs)
}
