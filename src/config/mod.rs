// src/config/mod.rs

//! Configuration loading and validation for eorwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate ranges, durations and strategy requirements (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    BookkeepingSection, CalculatorConfig, CalculatorSection, CompletenessConfig,
    CompletenessSection, ConfigFile, GeneralSection, InputSection, LoggingConfig, LoggingSection,
    RawConfigFile, RunsSection,
};
