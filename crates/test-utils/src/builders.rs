#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use eorwatch::config::{ConfigFile, RawConfigFile};
use eorwatch::run::Run;
use eorwatch::types::Strategy;

/// Builder for `RawConfigFile` / `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input.path = path.into();
        self
    }

    pub fn marker_suffix(mut self, suffix: &str) -> Self {
        self.config.input.marker_suffix = suffix.to_string();
        self
    }

    pub fn runs(mut self, first: Option<u64>, last: Option<u64>) -> Self {
        self.config.runs.first = first;
        self.config.runs.last = last;
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.completeness.strategy = strategy;
        self
    }

    pub fn calculator(mut self, program: &str) -> Self {
        self.config.completeness.calculator.program = Some(program.to_string());
        self
    }

    pub fn expected_workers(mut self, n: usize) -> Self {
        self.config.completeness.expected_workers = n;
        self
    }

    pub fn threshold(mut self, t: f64) -> Self {
        self.config.completeness.threshold = t;
        self
    }

    pub fn poll_interval(mut self, interval: &str) -> Self {
        self.config.general.poll_interval = Some(interval.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes a run directory with meta-files onto a real filesystem.
pub struct RunDirBuilder {
    dir: PathBuf,
    name: String,
    suffix: String,
}

impl RunDirBuilder {
    pub fn new(root: &Path, number: u64) -> Self {
        let name = format!("run{number}");
        let dir = root.join(&name);
        fs::create_dir_all(&dir).expect("Failed to create run directory");
        Self {
            dir,
            name,
            suffix: "hook".to_string(),
        }
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    fn write(&self, file: &str, contents: &str) {
        fs::write(self.dir.join(file), contents).expect("Failed to write meta-file");
    }

    /// One worker's MiniEoR summary.
    pub fn mini_eor(self, producer: &str, complete: bool) -> Self {
        self.write(
            &format!("{}_ls0000_MiniEoR_{producer}.jsn", self.name),
            &format!(r#"{{"isRunComplete": {complete}, "eventsInput": 100}}"#),
        );
        self
    }

    /// `count` workers named `bu-00`, `bu-01`, ..., all with the same flag.
    pub fn mini_eors(mut self, count: usize, complete: bool) -> Self {
        for i in 0..count {
            self = self.mini_eor(&format!("bu-{i:02}"), complete);
        }
        self
    }

    pub fn stream_file(self, lumi: u32, stream: &str) -> Self {
        self.write(
            &format!("{}_ls{lumi:04}_stream{stream}_mrg-01.jsn", self.name),
            r#"{"data": [0, 10, 0, "x.dat", 1024]}"#,
        );
        self
    }

    /// A MacroEoR verdict as the completeness calculator would write it.
    pub fn verdict(self, complete: bool) -> Self {
        self.write(
            &format!("{}_ls0000_MacroEoR_{}.jsn", self.name, self.suffix),
            &format!(r#"{{"isComplete": {complete}}}"#),
        );
        self
    }

    pub fn closed(self) -> Self {
        self.write(
            &format!("{}_ls0000_TransferEoR_{}.jsn", self.name, self.suffix),
            "",
        );
        self
    }

    pub fn build(self) -> Run {
        Run::from_path(&self.dir, self.suffix).expect("Failed to build run from directory")
    }
}
