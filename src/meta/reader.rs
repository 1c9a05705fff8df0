// src/meta/reader.rs

//! Readers for the JSON bodies of meta-files.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{EorError, Result};
use crate::fs::FileSystem;

use super::filename::MetaFilename;

/// JSON body of a MiniEoR file, as written by each merging worker.
#[derive(Debug, Clone, Deserialize)]
struct MiniEoRBody {
    #[serde(rename = "isRunComplete")]
    is_run_complete: Option<bool>,
    #[serde(rename = "eventsInput", default)]
    events_input: Option<u64>,
}

/// JSON body of the MacroEoR verdict written by the completeness calculator.
#[derive(Debug, Clone, Deserialize)]
struct MacroEoRBody {
    #[serde(rename = "isComplete")]
    is_complete: Option<bool>,
}

/// One worker's end-of-run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniEoRSummary {
    pub filename: MetaFilename,
    pub is_run_complete: bool,
    /// Events seen by the worker, when it reports them.
    pub events: Option<u64>,
}

/// Read and parse the MiniEoR file named by `filename`.
pub fn read_mini_eor(fs: &dyn FileSystem, filename: MetaFilename) -> Result<MiniEoRSummary> {
    let body: MiniEoRBody = read_json(fs, &filename.path)?;
    let is_run_complete = body.is_run_complete.ok_or_else(|| EorError::MissingField {
        path: filename.path.clone(),
        field: "isRunComplete",
    })?;
    debug!(path = ?filename.path, is_run_complete, "read MiniEoR summary");
    Ok(MiniEoRSummary {
        filename,
        is_run_complete,
        events: body.events_input,
    })
}

/// Read the `isComplete` flag of a MacroEoR verdict file.
pub fn read_macro_eor_verdict(fs: &dyn FileSystem, path: &Path) -> Result<bool> {
    let body: MacroEoRBody = read_json(fs, path)?;
    body.is_complete.ok_or_else(|| EorError::MissingField {
        path: path.to_path_buf(),
        field: "isComplete",
    })
}

/// Read failures surface as `EorError::Other` (IO). Bad JSON, including
/// bytes that are not UTF-8, or a field of the wrong type is `MalformedJson`.
fn read_json<T: DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> Result<T> {
    let contents = fs.read(path)?;
    serde_json::from_slice(&contents).map_err(|source| EorError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })
}
