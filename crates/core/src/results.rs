//! Result types for runner operations
//!
//! Outcomes of a suite run and the summaries handed back to the CLI.

use crate::discovery::SpecFile;
use crate::types::{RunnerError, RunnerResult};

/// Pass/fail result of a single suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteOutcome {
    pub file: SpecFile,
    pub passed: bool,
}

/// Summary of a full pass over the matched suites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub attempted: usize,
    /// Failed suites in match order
    pub failed: Vec<SpecFile>,
}

impl SuiteReport {
    /// Fold outcomes into a report without touching any shared state
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = SuiteOutcome>,
    {
        outcomes
            .into_iter()
            .fold(SuiteReport::default(), |mut report, outcome| {
                report.attempted += 1;
                if !outcome.passed {
                    report.failed.push(outcome.file);
                }
                report
            })
    }

    pub fn passed(&self) -> usize {
        self.attempted - self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Relative paths of the failed suites
    pub fn failed_paths(&self) -> Vec<String> {
        self.failed.iter().map(SpecFile::display_relative).collect()
    }

    pub fn into_result(self) -> RunnerResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(RunnerError::SuitesFailed(self.failed_paths()))
        }
    }
}

/// Information about a task and its place in the graph
#[derive(Debug, Clone)]
pub struct TaskInfo {
    pub name: String,
    pub description: String,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

/// Result of listing the known tasks
#[derive(Debug)]
pub struct TaskListResult {
    pub tasks: Vec<TaskInfo>,
}

/// Result of planning a run without executing it
#[derive(Debug, Clone)]
pub struct RunPlanResult {
    /// Requested tasks, with `default` filled in when none were given
    pub targets: Vec<String>,
    /// Tasks in the order they would run
    pub order: Vec<TaskInfo>,
}
