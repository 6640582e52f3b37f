use anyhow::Result;
use colored::*;
use galen_runner_core::project_manager::ProjectManager;

pub fn execute(manager: &ProjectManager, tasks: &[String]) -> Result<()> {
    let plan = manager
        .get_execution_plan(tasks)
        .map_err(|e| anyhow::anyhow!("Failed to get execution plan: {}", e))?;

    println!(
        "{} {}",
        "Execution plan for".bold(),
        plan.targets.join(", ").cyan()
    );

    println!("\n{}:", "Execution order".bold());
    for (i, task) in plan.order.iter().enumerate() {
        println!("  {}. {} {}", i + 1, task.name, task.description.dimmed());
    }

    Ok(())
}
