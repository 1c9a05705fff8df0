// src/errors.rs

//! Crate-wide error types.
//!
//! Callers are expected to tell these apart: a run that fails to evaluate
//! (`MalformedJson`, `MissingField`, `DelegateFailure`) is logged differently
//! from a run that is simply not finished yet.

use std::path::PathBuf;

use thiserror::Error;

/// Why a path was rejected by the meta-file decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilenameError {
    #[error("Bad filename `{0}', expect `.jsn' extension!")]
    WrongExtension(String),

    #[error("Bad filename `{0}', expect `*_*_*_*.jsn' form!")]
    WrongTokenCount(String),

    #[error("Bad filename `{0}', expect `run<N>_*_*_*.jsn' form!")]
    BadRunToken(String),

    #[error("Bad filename `{0}', expect `*_ls<M>_*_*.jsn' form!")]
    BadLumiToken(String),
}

#[derive(Error, Debug)]
pub enum EorError {
    #[error(transparent)]
    InvalidFilename(#[from] FilenameError),

    #[error("not a run directory: {0}")]
    NotARunDirectory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON in {path:?}: {source}")]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing field `{field}` in {path:?}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("completeness calculator failed for run {run}: {reason}")]
    DelegateFailure { run: u64, reason: String },

    #[error("could not create closed marker {path:?}: {reason}")]
    MarkerCreation { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, EorError>;
