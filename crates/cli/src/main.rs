use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use galen_runner_core::configs::runner::CliOverrides;
use galen_runner_core::project_manager::{ProjectManager, ProjectManagerConfig};

mod commands;

/// Galen Runner - run Galen layout suites and serve their reports
#[derive(Parser)]
#[command(name = "galen-runner")]
#[command(about = "Run Galen layout suites and serve their HTML reports")]
#[command(version)]
struct Cli {
    /// Tasks to run: clean, logging, test, serve or default (the default)
    tasks: Vec<String>,

    /// Path to the project root (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Execution target handed to Galen, e.g. "phantomjs"
    #[arg(long, env = "GALEN_BROWSER")]
    browser: Option<String>,

    /// PhantomJS binary used when the browser is "phantomjs"
    #[arg(long, env = "PHANTOMJS_BINARY")]
    phantomjs_binary: Option<PathBuf>,

    /// Port for the report server
    #[arg(long)]
    port: Option<u16>,

    /// Show the execution order without running anything
    #[arg(long, conflicts_with_all = ["list", "config_schema"])]
    plan: bool,

    /// List all tasks and their dependencies
    #[arg(long, conflicts_with = "config_schema")]
    list: bool,

    /// Print the JSON Schema of galen-runner.yml
    #[arg(long)]
    config_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.config_schema {
        return commands::schema::execute();
    }

    let manager = ProjectManager::new(ProjectManagerConfig {
        project_root: cli.project,
        overrides: CliOverrides {
            browser: cli.browser,
            phantomjs_binary: cli.phantomjs_binary,
            port: cli.port,
        },
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize project: {}", e))?;

    // Execute command (CLI layer only handles presentation)
    if cli.list {
        commands::list::execute(&manager)
    } else if cli.plan {
        commands::plan::execute(&manager, &cli.tasks)
    } else {
        commands::run::execute(&manager, &cli.tasks).await
    }
}
