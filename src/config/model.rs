// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::run::{RunRange, DEFAULT_MARKER_SUFFIX};
use crate::types::{LogFormat, Strategy};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [general]
/// dry_run = true
/// poll_interval = "30s"
///
/// [input]
/// path = "/store/lustre/transfer"
/// marker_suffix = "hook"
///
/// [runs]
/// first = 230195
/// last = 230201
///
/// [completeness]
/// strategy = "delegate"
/// expected_workers = 15
/// threshold = 1.0
/// debug_level = 10
///
/// [completeness.calculator]
/// program = "/opt/merger/isCompleteRun"
/// timeout = "10m"
///
/// [bookkeeping]
/// command = "/opt/bookkeeping/close-run"
///
/// [logging]
/// level = "info"
/// filename = "eor.log"
/// format = "full"
/// ```
///
/// All sections are optional and have defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub general: GeneralSection,

    #[serde(default)]
    pub input: InputSection,

    #[serde(default)]
    pub runs: RunsSection,

    #[serde(default)]
    pub completeness: CompletenessSection,

    #[serde(default)]
    pub bookkeeping: BookkeepingSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[general]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSection {
    /// Passed to the bookkeeping collaborator; closing itself is unaffected.
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Duration string (e.g. `"30s"`). When set, passes repeat at this
    /// interval until interrupted; otherwise a single pass is made.
    #[serde(default)]
    pub poll_interval: Option<String>,
}

fn default_dry_run() -> bool {
    true
}

impl Default for GeneralSection {
    fn default() -> Self {
        Self {
            dry_run: default_dry_run(),
            poll_interval: None,
        }
    }
}

/// `[input]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct InputSection {
    /// Directory holding the `run<N>` directories.
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Last token of the TransferEoR / MacroEoR file names.
    #[serde(default = "default_marker_suffix")]
    pub marker_suffix: String,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("/store/lustre/transfer")
}

fn default_marker_suffix() -> String {
    DEFAULT_MARKER_SUFFIX.to_string()
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            marker_suffix: default_marker_suffix(),
        }
    }
}

/// `[runs]` section: inclusive bounds, each optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RunsSection {
    #[serde(default)]
    pub first: Option<u64>,

    #[serde(default)]
    pub last: Option<u64>,
}

/// `[completeness]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletenessSection {
    #[serde(default)]
    pub strategy: Strategy,

    /// Number of MiniEoR files the aggregate strategy requires.
    #[serde(default = "default_expected_workers")]
    pub expected_workers: usize,

    /// Fraction handed to the calculator, in `[0, 1]`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_debug_level")]
    pub debug_level: u32,

    #[serde(default)]
    pub calculator: CalculatorSection,
}

fn default_expected_workers() -> usize {
    15
}

fn default_threshold() -> f64 {
    1.0
}

fn default_debug_level() -> u32 {
    10
}

impl Default for CompletenessSection {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            expected_workers: default_expected_workers(),
            threshold: default_threshold(),
            debug_level: default_debug_level(),
            calculator: CalculatorSection::default(),
        }
    }
}

/// `[completeness.calculator]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CalculatorSection {
    /// Required when `strategy = "delegate"`.
    #[serde(default)]
    pub program: Option<String>,

    /// Extra arguments placed before the per-run arguments.
    #[serde(default)]
    pub args: Vec<String>,

    /// Optional deadline, e.g. `"10m"`.
    #[serde(default)]
    pub timeout: Option<String>,
}

/// `[bookkeeping]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BookkeepingSection {
    /// Command run after each close; if absent closes are only logged.
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,

    /// Append logs to this file instead of stderr.
    #[serde(default)]
    pub filename: Option<PathBuf>,

    #[serde(default)]
    pub format: LogFormat,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>`, so every value here has
/// passed the checks in `validate.rs`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub dry_run: bool,
    pub poll_interval: Option<Duration>,
    pub input_path: PathBuf,
    pub marker_suffix: String,
    pub runs: RunRange,
    pub completeness: CompletenessConfig,
    pub bookkeeping: BookkeepingSection,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct CompletenessConfig {
    pub strategy: Strategy,
    pub expected_workers: usize,
    pub threshold: f64,
    pub debug_level: u32,
    pub calculator: Option<CalculatorConfig>,
}

#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Option<tracing::Level>,
    pub filename: Option<PathBuf>,
    pub format: LogFormat,
}
