// src/meta/mod.rs

//! Meta-files: the small `.jsn` JSON documents the merging tiers drop next to
//! the data they describe.
//!
//! - [`filename`] decodes the four-token file name grammar without touching
//!   the filesystem.
//! - [`reader`] parses the JSON bodies the run-closing logic cares about
//!   (MiniEoR worker summaries and the MacroEoR verdict).

pub mod filename;
pub mod reader;

pub use filename::{Category, MetaFilename, META_EXTENSION};
pub use reader::{read_macro_eor_verdict, read_mini_eor, MiniEoRSummary};
