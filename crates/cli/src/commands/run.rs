use anyhow::Result;
use colored::*;
use galen_runner_core::project_manager::ProjectManager;

pub async fn execute(manager: &ProjectManager, tasks: &[String]) -> Result<()> {
    let label = if tasks.is_empty() {
        "default".to_string()
    } else {
        tasks.join(", ")
    };
    println!("{} {}", "Running".bold(), label.cyan());

    let summary = manager
        .run_tasks(tasks)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run tasks: {}", e))?;

    println!();
    if let Some(report) = &summary.suite_report {
        println!(
            "{} {}",
            "✓".green().bold(),
            format!("{} suite(s) passed", report.passed()).green()
        );
    }
    println!(
        "{} {}",
        "✓".green().bold(),
        "All tasks completed successfully!".green().bold()
    );

    Ok(())
}
