//! Galen command construction and execution
//!
//! This module builds the argument list for a single Galen invocation and runs it
//! with the parent's stdio so Galen's own output shows up directly.

use std::path::PathBuf;
use std::process::Command;

use crate::discovery::SpecFile;
use crate::types::{RunnerError, RunnerResult};

/// Everything needed to turn a spec file into a Galen invocation
#[derive(Debug, Clone)]
pub struct GalenCommand {
    pub program: String,
    pub reports_dir: PathBuf,
    /// Extra flag selecting the execution target, e.g. the PhantomJS binary
    pub target_flag: Option<String>,
    /// Working directory for the child process
    pub working_dir: Option<PathBuf>,
}

impl GalenCommand {
    pub fn new(program: impl Into<String>, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            reports_dir: reports_dir.into(),
            target_flag: None,
            working_dir: None,
        }
    }

    pub fn with_target_flag(mut self, flag: Option<String>) -> Self {
        self.target_flag = flag;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// `test <path> [<target flag>] --htmlreport <reports>/<relative without extension>`
    pub fn arguments(&self, file: &SpecFile) -> Vec<String> {
        let mut args = vec![
            "test".to_string(),
            file.path.display().to_string(),
        ];
        if let Some(flag) = &self.target_flag {
            args.push(flag.clone());
        }
        args.push("--htmlreport".to_string());
        args.push(file.report_path(&self.reports_dir).display().to_string());
        args
    }
}

/// Runs one suite and reports whether it passed
pub trait SuiteExecutor {
    fn execute(&self, command: &GalenCommand, file: &SpecFile) -> RunnerResult<bool>;
}

/// Spawns the real Galen process and blocks until it exits
#[derive(Debug, Default)]
pub struct GalenExecutor;

impl SuiteExecutor for GalenExecutor {
    fn execute(&self, command: &GalenCommand, file: &SpecFile) -> RunnerResult<bool> {
        let args = command.arguments(file);
        let mut process = Command::new(&command.program);
        process.args(&args);
        if let Some(dir) = &command.working_dir {
            process.current_dir(dir);
        }

        tracing::debug!(program = %command.program, ?args, "spawning galen");

        let status = process.status().map_err(|source| RunnerError::Spawn {
            command: command.program.clone(),
            source,
        })?;

        // A signal-terminated process has no code and counts as a failure
        Ok(status.success())
    }
}
