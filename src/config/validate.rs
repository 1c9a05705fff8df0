// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    CalculatorConfig, CompletenessConfig, ConfigFile, LoggingConfig, RawConfigFile,
};
use crate::errors::{EorError, Result};
use crate::logging::parse_level_str;
use crate::run::RunRange;
use crate::types::{parse_duration, Strategy};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = EorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_input(&raw)?;
        let runs = validate_runs(&raw)?;
        let completeness = validate_completeness(&raw)?;
        let logging = validate_logging(&raw)?;
        let poll_interval = raw
            .general
            .poll_interval
            .as_deref()
            .map(|s| duration_field("[general].poll_interval", s))
            .transpose()?;

        if poll_interval == Some(Duration::ZERO) {
            return Err(EorError::ConfigError(
                "[general].poll_interval must be greater than zero".to_string(),
            ));
        }

        Ok(ConfigFile {
            dry_run: raw.general.dry_run,
            poll_interval,
            input_path: raw.input.path,
            marker_suffix: raw.input.marker_suffix,
            runs,
            completeness,
            bookkeeping: raw.bookkeeping,
            logging,
        })
    }
}

fn duration_field(field: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| EorError::ConfigError(format!("{field}: {e}")))
}

fn validate_input(cfg: &RawConfigFile) -> Result<()> {
    if cfg.input.path.as_os_str().is_empty() {
        return Err(EorError::ConfigError(
            "[input].path must not be empty".to_string(),
        ));
    }

    let suffix = &cfg.input.marker_suffix;
    // The suffix is the fourth `_`-separated token of the marker name.
    if suffix.is_empty() || suffix.contains('_') || suffix.contains('.') || suffix.contains('/') {
        return Err(EorError::ConfigError(format!(
            "[input].marker_suffix must be a non-empty token without '_', '.' or '/' (got {:?})",
            suffix
        )));
    }
    Ok(())
}

fn validate_runs(cfg: &RawConfigFile) -> Result<RunRange> {
    let range = RunRange::new(cfg.runs.first, cfg.runs.last);
    if let (Some(first), Some(last)) = (range.first, range.last) {
        if first > last {
            return Err(EorError::ConfigError(format!(
                "[runs].first ({first}) must not be greater than [runs].last ({last})"
            )));
        }
    }
    Ok(range)
}

fn validate_completeness(cfg: &RawConfigFile) -> Result<CompletenessConfig> {
    let section = &cfg.completeness;

    if section.expected_workers == 0 {
        return Err(EorError::ConfigError(
            "[completeness].expected_workers must be >= 1 (got 0)".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&section.threshold) {
        return Err(EorError::ConfigError(format!(
            "[completeness].threshold must be within [0, 1] (got {})",
            section.threshold
        )));
    }

    let calculator = match section.calculator.program.as_deref().map(str::trim) {
        Some(program) if !program.is_empty() => {
            let timeout = section
                .calculator
                .timeout
                .as_deref()
                .map(|s| duration_field("[completeness.calculator].timeout", s))
                .transpose()?;
            Some(CalculatorConfig {
                program: program.to_string(),
                args: section.calculator.args.clone(),
                timeout,
            })
        }
        _ => None,
    };

    if section.strategy == Strategy::Delegate && calculator.is_none() {
        return Err(EorError::ConfigError(
            "strategy \"delegate\" requires [completeness.calculator].program".to_string(),
        ));
    }

    Ok(CompletenessConfig {
        strategy: section.strategy,
        expected_workers: section.expected_workers,
        threshold: section.threshold,
        debug_level: section.debug_level,
        calculator,
    })
}

fn validate_logging(cfg: &RawConfigFile) -> Result<LoggingConfig> {
    let level = match cfg.logging.level.as_deref() {
        Some(s) => Some(parse_level_str(s).ok_or_else(|| {
            EorError::ConfigError(format!(
                "[logging].level must be one of error, warn, info, debug, trace (got {:?})",
                s
            ))
        })?),
        None => None,
    };

    Ok(LoggingConfig {
        level,
        filename: cfg.logging.filename.clone(),
        format: cfg.logging.format,
    })
}
