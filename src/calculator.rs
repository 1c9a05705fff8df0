// src/calculator.rs

//! Boundary to the external run-completeness calculator.
//!
//! The calculator inspects the per-stream progress files of a run directory
//! and writes `<run>_ls0000_MacroEoR_<suffix>.jsn` with an `isComplete` flag.
//! This crate only invokes it; the evaluator reads the verdict afterwards.
//!
//! - [`CommandCalculator`] runs the calculator as a child process.
//! - Tests provide their own [`CompletenessCalculator`] that writes (or
//!   deliberately does not write) the verdict file.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{EorError, Result};

/// Everything the calculator needs to evaluate one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorRequest {
    pub run: u64,
    pub run_dir: PathBuf,
    pub debug_level: u32,
    /// Fraction of expected input that must be merged, in `[0, 1]`.
    pub threshold: f64,
    pub suffix: String,
}

/// Trait abstracting how the completeness calculator is invoked.
pub trait CompletenessCalculator: Send + Sync {
    /// Run the calculator for one run directory.
    ///
    /// `Ok(())` means the calculator finished; it says nothing about whether
    /// the verdict file was actually written.
    fn calculate<'a>(
        &'a self,
        request: &'a CalculatorRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Runs the calculator as an external program:
///
/// `<program> [args..] --debug <n> --input <dir> --threshold <t> --suffix <s>`
#[derive(Debug, Clone)]
pub struct CommandCalculator {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandCalculator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    fn command(&self, request: &CalculatorRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--debug")
            .arg(request.debug_level.to_string())
            .arg("--input")
            .arg(&request.run_dir)
            .arg("--threshold")
            .arg(request.threshold.to_string())
            .arg("--suffix")
            .arg(&request.suffix)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, request: &CalculatorRequest) -> Result<()> {
        let failure = |reason: String| EorError::DelegateFailure {
            run: request.run,
            reason,
        };

        info!(run = request.run, program = %self.program, "running completeness calculator");
        let output = self.command(request).output();

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, output)
                .await
                .map_err(|_| failure(format!("timed out after {limit:?}")))?,
            None => output.await,
        }
        .map_err(|e| failure(format!("could not run `{}`: {e}", self.program)))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(run = request.run, "calculator stdout: {}", line);
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            debug!(run = request.run, "calculator stderr: {}", line);
        }

        if !output.status.success() {
            return Err(failure(format!("`{}` exited with {}", self.program, output.status)));
        }
        Ok(())
    }
}

impl CompletenessCalculator for CommandCalculator {
    fn calculate<'a>(
        &'a self,
        request: &'a CalculatorRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.run(request))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn request(dir: &std::path::Path) -> CalculatorRequest {
        CalculatorRequest {
            run: 230195,
            run_dir: dir.to_path_buf(),
            debug_level: 10,
            threshold: 1.0,
            suffix: "hook".to_string(),
        }
    }

    #[tokio::test]
    async fn passes_request_as_arguments() {
        let dir = tempfile::tempdir().unwrap();
        // `sh -c <script> <$0> <$1..>`: the script echoes its arguments into a file.
        let out = dir.path().join("args.txt");
        let script = format!("echo \"$@\" > {}", out.display());
        let calc = CommandCalculator::new("sh", vec!["-c".into(), script, "calc".into()], None);

        calc.calculate(&request(dir.path())).await.unwrap();

        let args = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            args.trim(),
            format!("--debug 10 --input {} --threshold 1 --suffix hook", dir.path().display())
        );
    }

    #[tokio::test]
    async fn non_zero_exit_is_delegate_failure() {
        let dir = tempfile::tempdir().unwrap();
        let calc = CommandCalculator::new("sh", vec!["-c".into(), "exit 3".into()], None);
        let err = calc.calculate(&request(dir.path())).await.unwrap_err();
        assert!(matches!(err, EorError::DelegateFailure { run: 230195, .. }));
    }

    #[tokio::test]
    async fn missing_program_is_delegate_failure() {
        let dir = tempfile::tempdir().unwrap();
        let calc = CommandCalculator::new("/definitely/not/here", vec![], None);
        let err = calc.calculate(&request(dir.path())).await.unwrap_err();
        assert!(matches!(err, EorError::DelegateFailure { .. }));
    }

    #[tokio::test]
    async fn deadline_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let calc = CommandCalculator::new(
            "sh",
            vec!["-c".into(), "sleep 5".into()],
            Some(Duration::from_millis(100)),
        );
        let err = calc.calculate(&request(dir.path())).await.unwrap_err();
        match err {
            EorError::DelegateFailure { reason, .. } => assert!(reason.contains("timed out")),
            other => panic!("expected DelegateFailure, got {other:?}"),
        }
    }
}
