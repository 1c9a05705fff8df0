use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use eorwatch::calculator::{CalculatorRequest, CompletenessCalculator};
use eorwatch::close::Bookkeeper;
use eorwatch::errors::{EorError, Result};
use eorwatch::fs::mock::MockFileSystem;

/// Where a [`FakeCalculator`] writes its verdict files.
#[derive(Debug, Clone)]
pub enum VerdictSink {
    Disk,
    Mock(MockFileSystem),
}

/// A fake completeness calculator that:
/// - records every request it receives
/// - writes `{"isComplete": <verdict>}` (or a raw body) for runs it has a
///   verdict for
/// - writes nothing for other runs, like a calculator that silently failed.
#[derive(Debug, Clone)]
pub struct FakeCalculator {
    sink: VerdictSink,
    verdicts: HashMap<u64, String>,
    fail: bool,
    requests: Arc<Mutex<Vec<CalculatorRequest>>>,
}

impl FakeCalculator {
    pub fn new(sink: VerdictSink) -> Self {
        Self {
            sink,
            verdicts: HashMap::new(),
            fail: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn verdict(self, run: u64, complete: bool) -> Self {
        self.raw_verdict(run, &format!(r#"{{"isComplete": {complete}}}"#))
    }

    /// Write `body` verbatim as the verdict file for `run`.
    pub fn raw_verdict(mut self, run: u64, body: &str) -> Self {
        self.verdicts.insert(run, body.to_string());
        self
    }

    /// Every call returns an error without writing anything.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn requests(&self) -> Vec<CalculatorRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompletenessCalculator for FakeCalculator {
    fn calculate<'a>(
        &'a self,
        request: &'a CalculatorRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        self.requests.lock().unwrap().push(request.clone());

        let outcome = if self.fail {
            Err(EorError::Other(anyhow::anyhow!("calculator crashed")))
        } else {
            if let Some(body) = self.verdicts.get(&request.run) {
                let name = request
                    .run_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let path = request
                    .run_dir
                    .join(format!("{name}_ls0000_MacroEoR_{}.jsn", request.suffix));
                match &self.sink {
                    VerdictSink::Disk => {
                        std::fs::write(&path, body).expect("Failed to write verdict file")
                    }
                    VerdictSink::Mock(fs) => fs.add_file(&path, body.as_str()),
                }
            }
            Ok(())
        };

        Box::pin(std::future::ready(outcome))
    }
}

/// A bookkeeper that records `(run, dry_run)` for every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingBookkeeper {
    calls: Arc<Mutex<Vec<(u64, bool)>>>,
}

impl RecordingBookkeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(u64, bool)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn closed_runs(&self) -> Vec<u64> {
        self.calls().into_iter().map(|(run, _)| run).collect()
    }
}

impl Bookkeeper for RecordingBookkeeper {
    fn run_closed(
        &self,
        run: u64,
        dry_run: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.calls.lock().unwrap().push((run, dry_run));
        Box::pin(std::future::ready(Ok(())))
    }
}
