// src/run/mod.rs

//! Run directories.
//!
//! A run is a directory named `run<N>` under the input root. Whether it is
//! open or closed is never stored anywhere but the filesystem: the run is
//! closed exactly when its TransferEoR marker file exists.

pub mod scanner;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::{EorError, Result};
use crate::fs::FileSystem;
use crate::meta::META_EXTENSION;

pub use scanner::scan_runs;

/// Default discriminator appended to the marker and verdict file names.
pub const DEFAULT_MARKER_SUFFIX: &str = "hook";

const RUN_DIR_PREFIX: &str = "run";
const RUN_LEVEL_LUMI: &str = "ls0000";
const TRANSFER_EOR: &str = "TransferEoR";
const MACRO_EOR: &str = "MacroEoR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub number: u64,
    /// Directory name, e.g. `run230195`.
    pub name: String,
    pub path: PathBuf,
    pub suffix: String,
}

impl Run {
    /// Build a run from its directory path.
    ///
    /// Fails with [`EorError::NotARunDirectory`] when the directory name is not
    /// `run` followed by digits.
    pub fn from_path(path: impl AsRef<Path>, suffix: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let number = parse_run_dir_name(&name)
            .ok_or_else(|| EorError::NotARunDirectory(name.clone()))?;

        Ok(Self {
            number,
            name,
            path: path.to_path_buf(),
            suffix: suffix.into(),
        })
    }

    /// `<path>/<name>_ls0000_TransferEoR_<suffix>.jsn`
    pub fn closed_marker_path(&self) -> PathBuf {
        self.run_level_file(TRANSFER_EOR)
    }

    /// `<path>/<name>_ls0000_MacroEoR_<suffix>.jsn`, written by the
    /// completeness calculator.
    pub fn verdict_path(&self) -> PathBuf {
        self.run_level_file(MACRO_EOR)
    }

    fn run_level_file(&self, category: &str) -> PathBuf {
        self.path.join(format!(
            "{}_{}_{}_{}.{}",
            self.name, RUN_LEVEL_LUMI, category, self.suffix, META_EXTENSION
        ))
    }

    pub fn state(&self, fs: &dyn FileSystem) -> RunState {
        if fs.exists(&self.closed_marker_path()) {
            RunState::Closed
        } else {
            RunState::Open
        }
    }

    pub fn is_closed(&self, fs: &dyn FileSystem) -> bool {
        self.state(fs) == RunState::Closed
    }

    pub fn is_open(&self, fs: &dyn FileSystem) -> bool {
        !self.is_closed(fs)
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

fn parse_run_dir_name(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(RUN_DIR_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Inclusive run-number bounds; a missing bound is unbounded on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunRange {
    pub first: Option<u64>,
    pub last: Option<u64>,
}

impl RunRange {
    pub fn new(first: Option<u64>, last: Option<u64>) -> Self {
        Self { first, last }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, number: u64) -> bool {
        self.first.is_none_or(|first| number >= first)
            && self.last.is_none_or(|last| number <= last)
    }
}
