//! High-level project management interface
//!
//! This module provides the [`ProjectManager`] which serves as the primary interface
//! for the CLI. It loads the runner configuration, builds the task graph and
//! plans or executes runs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use galen_runner_core::project_manager::{ProjectManager, ProjectManagerConfig};
//! use std::path::PathBuf;
//!
//! # async fn example() -> galen_runner_core::types::RunnerResult<()> {
//! let manager = ProjectManager::new(ProjectManagerConfig {
//!     project_root: PathBuf::from("."),
//!     overrides: Default::default(),
//! })?;
//!
//! // Show what `galen-runner test` would do
//! let plan = manager.get_execution_plan(&["test".to_string()])?;
//!
//! // Run the suites and serve the reports
//! manager.run_tasks(&[]).await?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use crate::configs::runner::{load_runner_config, CliOverrides};
use crate::execution::command::GalenExecutor;
use crate::execution::dependencies::resolve_execution_order;
use crate::execution::runner::{HttpReportHost, RunContext, RunSummary, TaskRunner};
use crate::results::{RunPlanResult, TaskInfo, TaskListResult};
use crate::tasks::{TaskGraph, DEFAULT_TASK};
use crate::types::{RunnerError, RunnerResult};

/// High-level manager that encapsulates all runner operations
pub struct ProjectManager {
    pub context: RunContext,
    pub graph: TaskGraph,
}

/// Configuration for initializing a project manager
pub struct ProjectManagerConfig {
    pub project_root: PathBuf,
    pub overrides: CliOverrides,
}

impl ProjectManager {
    /// Load the project configuration and build the task graph
    pub fn new(config: ProjectManagerConfig) -> RunnerResult<Self> {
        let runner_config = load_runner_config(&config.project_root)?.with_overrides(config.overrides);

        // Surface a bad browser selection before anything is deleted
        runner_config.phantomjs_flag()?;

        let graph = TaskGraph::builtin()
            .map_err(|e| RunnerError::Task(format!("Failed to build task graph: {}", e)))?;

        Ok(Self {
            context: RunContext::new(config.project_root, runner_config),
            graph,
        })
    }

    /// List every known task with its direct dependencies and dependents
    pub fn list_tasks(&self) -> RunnerResult<TaskListResult> {
        let tasks = self
            .graph
            .tasks()
            .iter()
            .map(|task| self.task_info(&task.name))
            .collect::<RunnerResult<Vec<_>>>()?;
        Ok(TaskListResult { tasks })
    }

    /// Get the execution order for the given targets without running anything
    pub fn get_execution_plan(&self, targets: &[String]) -> RunnerResult<RunPlanResult> {
        let order = resolve_execution_order(&self.graph, targets)?
            .iter()
            .map(|name| self.task_info(name))
            .collect::<RunnerResult<Vec<_>>>()?;

        let targets = if targets.is_empty() {
            vec![DEFAULT_TASK.to_string()]
        } else {
            targets.to_vec()
        };

        Ok(RunPlanResult { targets, order })
    }

    /// Run the given targets and their prerequisites
    pub async fn run_tasks(&self, targets: &[String]) -> RunnerResult<RunSummary> {
        let order = resolve_execution_order(&self.graph, targets)?;
        TaskRunner::new(&self.graph, &self.context, GalenExecutor, HttpReportHost)
            .run(&order)
            .await
    }

    fn task_info(&self, name: &str) -> RunnerResult<TaskInfo> {
        let task = self
            .graph
            .get(name)
            .ok_or_else(|| RunnerError::Task(format!("Task '{}' not found", name)))?;
        Ok(TaskInfo {
            name: task.name.clone(),
            description: task.description.clone(),
            dependencies: task.dependencies.clone(),
            dependents: self.graph.dependents(name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::runner::CONFIG_FILE_NAME;

    fn manager(root: &std::path::Path, overrides: CliOverrides) -> RunnerResult<ProjectManager> {
        ProjectManager::new(ProjectManagerConfig {
            project_root: root.to_path_buf(),
            overrides,
        })
    }

    #[test]
    fn test_plan_defaults_to_default_task() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = manager(temp_dir.path(), CliOverrides::default()).unwrap();

        let plan = manager.get_execution_plan(&[]).unwrap();
        assert_eq!(plan.targets, vec!["default"]);
        let names: Vec<&str> = plan.order.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["clean", "logging", "test", "serve", "default"]);
    }

    #[test]
    fn test_list_tasks_reports_edges() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = manager(temp_dir.path(), CliOverrides::default()).unwrap();

        let list = manager.list_tasks().unwrap();
        assert_eq!(list.tasks.len(), 5);
        let test = list.tasks.iter().find(|t| t.name == "test").unwrap();
        assert_eq!(test.dependencies, vec!["logging"]);
        assert_eq!(test.dependents, vec!["serve"]);
    }

    #[test]
    fn test_config_file_and_overrides_are_merged() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "reportsDir: out/reports\nport: 4000\n",
        )
        .unwrap();

        let manager = manager(
            temp_dir.path(),
            CliOverrides {
                port: Some(5000),
                ..CliOverrides::default()
            },
        )
        .unwrap();

        assert_eq!(manager.context.config.port, 5000);
        assert_eq!(
            manager.context.reports_dir(),
            temp_dir.path().join("out/reports")
        );
    }

    #[test]
    fn test_phantomjs_without_binary_fails_early() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = manager(
            temp_dir.path(),
            CliOverrides {
                browser: Some("phantomjs".to_string()),
                ..CliOverrides::default()
            },
        );
        assert!(matches!(result, Err(RunnerError::Config(_))));
    }

    #[tokio::test]
    async fn test_unknown_task_is_rejected_before_running() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("reports")).unwrap();
        let manager = manager(temp_dir.path(), CliOverrides::default()).unwrap();

        let err = manager.run_tasks(&["build".to_string()]).await.unwrap_err();
        assert!(err.to_string().contains("Task 'build' not found"));
        assert!(temp_dir.path().join("reports").exists());
    }

    #[tokio::test]
    async fn test_clean_task_removes_reports() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp_dir.path().join("reports/usp")).unwrap();
        let manager = manager(temp_dir.path(), CliOverrides::default()).unwrap();

        let summary = manager.run_tasks(&["clean".to_string()]).await.unwrap();
        assert_eq!(summary.completed, vec!["clean"]);
        assert!(!temp_dir.path().join("reports").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_galen_finds_suites_from_relative_project_root() {
        let temp_dir = tempfile::tempdir_in(".").unwrap();
        let root = std::path::PathBuf::from(".").join(temp_dir.path().file_name().unwrap());
        let specs = root.join("tests/specs/usp");
        std::fs::create_dir_all(&specs).unwrap();
        std::fs::write(specs.join("usp.spec.js"), "test(\"usp\", function () {});").unwrap();
        std::fs::write(root.join("tests/specs/a.spec.js"), "test(\"a\", function () {});").unwrap();

        // `sh test <path> ...` runs the `test` script from the project root,
        // which passes only when the suite path exists from there
        std::fs::write(root.join(CONFIG_FILE_NAME), "galenCommand: sh\n").unwrap();
        std::fs::write(
            root.join("test"),
            "[ -f \"$1\" ] || exit 1\necho \"$1\" >> invocations.log\n",
        )
        .unwrap();

        let manager = manager(&root, CliOverrides::default()).unwrap();
        let summary = manager.run_tasks(&["test".to_string()]).await.unwrap();

        let report = summary.suite_report.unwrap();
        assert_eq!(report.attempted, 2);
        assert!(report.failed.is_empty());
        assert_eq!(
            std::fs::read_to_string(root.join("invocations.log")).unwrap(),
            "tests/specs/a.spec.js\ntests/specs/usp/usp.spec.js\n"
        );
    }
}
