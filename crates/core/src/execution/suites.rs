//! Sequential suite runner
//!
//! Runs every matched suite one after another. A failing suite never stops
//! the run; only a failure to spawn Galen at all does.

use colored::*;

use crate::discovery::SpecFile;
use crate::execution::command::{GalenCommand, SuiteExecutor};
use crate::results::{SuiteOutcome, SuiteReport};
use crate::types::RunnerResult;

/// Run each file through `executor` in order and fold the outcomes
pub fn run_suites(
    files: &[SpecFile],
    executor: &dyn SuiteExecutor,
    command: &GalenCommand,
) -> RunnerResult<SuiteReport> {
    let mut outcomes = Vec::with_capacity(files.len());

    for (i, file) in files.iter().enumerate() {
        let relative = file.display_relative();
        println!(
            "{} {}",
            format!("[{}/{}]", i + 1, files.len()).bright_black(),
            relative.cyan()
        );
        tracing::info!(suite = %relative, "running galen suite");

        let passed = executor.execute(command, file)?;
        if passed {
            println!("{} {}", "✓".green().bold(), relative);
        } else {
            println!("{} {}", "✗".red().bold(), relative.red());
            tracing::warn!(suite = %relative, "galen suite failed");
        }

        outcomes.push(SuiteOutcome {
            file: file.clone(),
            passed,
        });
    }

    Ok(SuiteReport::from_outcomes(outcomes))
}
