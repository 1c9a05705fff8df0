// src/types.rs

use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Which completeness predicate the orchestrator uses for each run.
///
/// - `Delegate`: run the external completeness calculator and read back the
///   MacroEoR verdict file (production default).
/// - `Aggregate`: count and read the per-worker MiniEoR files directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Delegate,
    Aggregate,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Delegate
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "delegate" => Ok(Strategy::Delegate),
            "aggregate" => Ok(Strategy::Aggregate),
            other => Err(format!(
                "invalid completeness strategy: {other} (expected \"delegate\" or \"aggregate\")"
            )),
        }
    }
}

/// Line format of the log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Full
    }
}

/// Parse a simple duration string like `"30s"`, `"250ms"`, `"10m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration '{}' is too large", s)),
        "h" => value
            .checked_mul(60 * 60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration '{}' is too large", s)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
