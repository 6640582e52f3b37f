//! High-level task runner
//!
//! Walks a resolved execution order and performs each task's action. Fatal
//! errors stop the run immediately; failing suites are remembered and
//! reported once every scheduled task has had its turn.

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use colored::*;
use tracing::{info, warn};

use crate::configs::runner::RunnerConfig;
use crate::discovery::discover_spec_files;
use crate::execution::command::{GalenCommand, SuiteExecutor};
use crate::execution::suites::run_suites;
use crate::results::SuiteReport;
use crate::server::ReportServer;
use crate::tasks::{get_task_color, TaskAction, TaskDefinition, TaskGraph};
use crate::types::{RunnerError, RunnerResult};

/// Where a run happens and how it is configured
#[derive(Debug, Clone)]
pub struct RunContext {
    pub project_root: PathBuf,
    pub config: RunnerConfig,
}

impl RunContext {
    pub fn new(project_root: impl Into<PathBuf>, config: RunnerConfig) -> Self {
        Self {
            project_root: project_root.into(),
            config,
        }
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.reports_dir)
    }

    pub fn server_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.config.port))
    }
}

/// Hosts the report server once the `serve` task is reached
pub trait ReportHost {
    fn host(
        &self,
        server: ReportServer,
        addr: SocketAddr,
    ) -> impl Future<Output = RunnerResult<()>>;
}

/// Serves reports over HTTP until the process is terminated
#[derive(Debug, Default)]
pub struct HttpReportHost;

impl ReportHost for HttpReportHost {
    fn host(
        &self,
        server: ReportServer,
        addr: SocketAddr,
    ) -> impl Future<Output = RunnerResult<()>> {
        server.serve(addr)
    }
}

/// What happened during a run that finished without a fatal error
#[derive(Debug, Default)]
pub struct RunSummary {
    pub completed: Vec<String>,
    pub suite_report: Option<SuiteReport>,
}

/// Runs tasks in dependency order
pub struct TaskRunner<'a, E, H> {
    graph: &'a TaskGraph,
    context: &'a RunContext,
    executor: E,
    host: H,
}

impl<'a, E: SuiteExecutor, H: ReportHost> TaskRunner<'a, E, H> {
    pub fn new(graph: &'a TaskGraph, context: &'a RunContext, executor: E, host: H) -> Self {
        Self {
            graph,
            context,
            executor,
            host,
        }
    }

    /// Run every task of `order`, which must already be dependencies-first
    pub async fn run(&self, order: &[String]) -> RunnerResult<RunSummary> {
        let mut summary = RunSummary::default();
        let mut deferred: Option<RunnerError> = None;

        for task_name in order {
            let task = self
                .graph
                .get(task_name)
                .ok_or_else(|| RunnerError::Task(format!("Task '{}' not found", task_name)))?;

            print_task_header(task);

            match self.run_task(task, &mut summary).await {
                Ok(()) => {}
                Err(e) if !e.is_fatal() => {
                    warn!("Task '{}' failed: {}", task.name, e);
                    println!("{} {}", "✗".red().bold(), e.to_string().red());
                    deferred = Some(e);
                }
                Err(e) => return Err(e),
            }

            summary.completed.push(task.name.clone());
        }

        match deferred {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    async fn run_task(&self, task: &TaskDefinition, summary: &mut RunSummary) -> RunnerResult<()> {
        match &task.action {
            TaskAction::CleanReports => clean_reports(&self.context.reports_dir()),
            TaskAction::Log(message) => {
                info!("{}", message);
                Ok(())
            }
            TaskAction::RunSuites => {
                let report = self.run_suites()?;
                summary.suite_report = Some(report.clone());
                report.into_result()
            }
            TaskAction::ServeReports => {
                let reports_dir = self.context.reports_dir();
                std::fs::create_dir_all(&reports_dir)?;

                let addr = self.context.server_addr();
                println!(
                    "{} {}",
                    "Serving reports at".bold(),
                    format!("http://localhost:{}", addr.port()).cyan()
                );
                let server = ReportServer::new(reports_dir, self.context.config.listing.clone());
                self.host.host(server, addr).await
            }
            TaskAction::Alias => Ok(()),
        }
    }

    fn run_suites(&self) -> RunnerResult<SuiteReport> {
        let config = &self.context.config;
        std::fs::create_dir_all(self.context.reports_dir())?;

        let files = discover_spec_files(&self.context.project_root, &config.suites_glob)?;
        info!(
            "Found {} suite(s) matching {}",
            files.len(),
            config.suites_glob
        );

        // Galen runs from the project root, so the relative reports dir is passed as-is
        let command = GalenCommand::new(&config.galen_command, &config.reports_dir)
            .with_target_flag(config.phantomjs_flag()?)
            .with_working_dir(&self.context.project_root);

        let report = run_suites(&files, &self.executor, &command)?;

        println!(
            "{} {} passed, {} failed",
            "Suites:".bold(),
            report.passed().to_string().green(),
            report.failed.len().to_string().red()
        );
        Ok(report)
    }
}

/// Delete the reports directory; a directory that does not exist is fine
pub fn clean_reports(reports_dir: &Path) -> RunnerResult<()> {
    match std::fs::remove_dir_all(reports_dir) {
        Ok(()) => {
            info!("Removed {}", reports_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(RunnerError::Clean {
            path: reports_dir.to_path_buf(),
            source,
        }),
    }
}

fn print_task_header(task: &TaskDefinition) {
    println!();
    println!(
        "┌─ {} {}",
        "Running task".bold(),
        format!("'{}'", task.name).color(get_task_color(&task.name)).bold()
    );
    if !task.description.is_empty() {
        println!("└─ {}", task.description.bright_black());
    }
}
