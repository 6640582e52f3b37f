use anyhow::Result;
use colored::*;
use galen_runner_core::project_manager::ProjectManager;
use galen_runner_core::tasks::get_task_color;

pub fn execute(manager: &ProjectManager) -> Result<()> {
    println!("{}", "Tasks".bold().underline());

    let result = manager
        .list_tasks()
        .map_err(|e| anyhow::anyhow!("Failed to list tasks: {}", e))?;

    for task in &result.tasks {
        println!(
            "{} {}",
            task.name.color(get_task_color(&task.name)).bold(),
            task.description.dimmed()
        );

        if !task.dependencies.is_empty() {
            println!("  {} {}", "depends on:".dimmed(), task.dependencies.join(", "));
        } else {
            println!("  {}", "no dependencies".dimmed());
        }
        if !task.dependents.is_empty() {
            println!("  {} {}", "required by:".dimmed(), task.dependents.join(", "));
        }
        println!();
    }

    let config = &manager.context.config;
    println!("{}", "Configuration".bold().underline());
    println!("  {} {}", "suites:".dimmed(), config.suites_glob);
    println!("  {} {}", "reports:".dimmed(), manager.context.reports_dir().display());
    println!("  {} {}", "port:".dimmed(), config.port);
    if let Some(browser) = &config.browser {
        println!("  {} {}", "browser:".dimmed(), browser);
    }

    Ok(())
}
