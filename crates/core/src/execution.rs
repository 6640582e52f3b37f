//! Task execution module
//!
//! This module handles running tasks: Galen command construction, the
//! sequential suite runner, dependency ordering and the task runner itself.

pub mod command;
pub mod dependencies;
pub mod runner;
pub mod suites;

pub use command::{GalenCommand, GalenExecutor, SuiteExecutor};
pub use dependencies::resolve_execution_order;
pub use runner::{HttpReportHost, ReportHost, RunContext, RunSummary, TaskRunner};
pub use suites::run_suites;
