// src/meta/filename.rs

//! Decoder for meta-file names of the form
//! `run<N>_ls<M>_<category>_<producer>.jsn`, e.g.
//!
//! - `run229878_ls0021_streamA_StorageManager.jsn`
//! - `run229878_ls0019_streamL1Rates_mrg-c2f13-35-01.jsn`
//! - `run229878_ls0000_MiniEoR_bu-c2e18-09-01.jsn`

use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::FilenameError;

/// Extension every meta-file carries.
pub const META_EXTENSION: &str = "jsn";

const RUN_MARKER: &str = "run";
const LUMI_MARKER: &str = "ls";
const STREAM_MARKER: &str = "stream";
const MINI_EOR_MARKER: &str = "MiniEoR";

/// Kind of meta-file, derived from the third token.
///
/// Classification is ordered: a token containing `stream` is a
/// `MacroMerger` file even if it also contains `MiniEoR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Category {
    MacroMerger { stream: String },
    MiniEoR,
    Unknown,
}

impl Category {
    fn classify(token: &str) -> Self {
        if token.contains(STREAM_MARKER) {
            Category::MacroMerger {
                stream: token.replace(STREAM_MARKER, ""),
            }
        } else if token.contains(MINI_EOR_MARKER) {
            Category::MiniEoR
        } else {
            Category::Unknown
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::MacroMerger { stream } => write!(f, "MacroMerger(stream{stream})"),
            Category::MiniEoR => f.write_str("MiniEoR"),
            Category::Unknown => f.write_str("Unknown"),
        }
    }
}

/// A successfully decoded meta-file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFilename {
    pub path: PathBuf,
    pub run: u64,
    pub lumi: u32,
    pub category: Category,
    /// Raw fourth token (producing host or application); not interpreted.
    pub producer: String,
}

impl MetaFilename {
    pub fn decode(path: impl AsRef<Path>) -> Result<Self, FilenameError> {
        let path = path.as_ref();
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let root = match basename.rsplit_once('.') {
            Some((root, ext)) if ext == META_EXTENSION && !root.is_empty() => root,
            _ => return Err(FilenameError::WrongExtension(basename)),
        };

        let tokens: Vec<&str> = root.split('_').collect();
        let [run_token, lumi_token, category_token, producer] = tokens.as_slice() else {
            return Err(FilenameError::WrongTokenCount(basename));
        };

        let run = parse_marked(run_token, RUN_MARKER)
            .ok_or_else(|| FilenameError::BadRunToken(basename.clone()))?;
        let lumi = parse_marked(lumi_token, LUMI_MARKER)
            .ok_or_else(|| FilenameError::BadLumiToken(basename.clone()))?;

        Ok(Self {
            path: path.to_path_buf(),
            run,
            lumi,
            category: Category::classify(category_token),
            producer: producer.to_string(),
        })
    }

    /// Stream name, only present for `MacroMerger` files.
    pub fn stream(&self) -> Option<&str> {
        match &self.category {
            Category::MacroMerger { stream } => Some(stream),
            _ => None,
        }
    }

    pub fn is_mini_eor(&self) -> bool {
        self.category == Category::MiniEoR
    }
}

/// Token must contain `marker`; what is left once the marker is removed must
/// be a non-negative integer (zero padding allowed).
fn parse_marked<T: std::str::FromStr>(token: &str, marker: &str) -> Option<T> {
    if !token.contains(marker) {
        return None;
    }
    let digits = token.replace(marker, "");
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
