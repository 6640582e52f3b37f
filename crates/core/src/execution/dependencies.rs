//! Task dependency resolution
//!
//! Turns the requested task names into a flat execution order where every
//! task appears once and after all of its prerequisites.

use std::collections::HashSet;

use crate::tasks::{TaskGraph, DEFAULT_TASK};
use crate::types::{RunnerError, RunnerResult};

/// Resolve the requested targets into a dependencies-first execution order.
///
/// An empty target list selects the `default` task. Shared prerequisites of
/// several targets are only scheduled once.
pub fn resolve_execution_order(graph: &TaskGraph, targets: &[String]) -> RunnerResult<Vec<String>> {
    let default_targets = [DEFAULT_TASK.to_string()];
    let targets = if targets.is_empty() {
        &default_targets[..]
    } else {
        targets
    };

    for target in targets {
        if !graph.contains(target) {
            return Err(RunnerError::Task(format!("Task '{}' not found", target)));
        }
    }

    let mut order = Vec::new();
    let mut scheduled = HashSet::new();

    for target in targets {
        // (task, dependencies already expanded)
        let mut stack = vec![(target.clone(), false)];

        while let Some((task, expanded)) = stack.pop() {
            if scheduled.contains(&task) {
                continue;
            }

            if expanded {
                scheduled.insert(task.clone());
                order.push(task);
                continue;
            }

            stack.push((task.clone(), true));
            // Reverse so the first declared dependency is visited first
            for dep in graph.dependencies(&task)?.iter().rev() {
                if !scheduled.contains(dep) {
                    stack.push((dep.clone(), false));
                }
            }
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::{TaskAction, TaskDefinition};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_targets_selects_default() {
        let graph = TaskGraph::builtin().unwrap();
        let order = resolve_execution_order(&graph, &[]).unwrap();
        assert_eq!(order, names(&["clean", "logging", "test", "serve", "default"]));
    }

    #[test]
    fn test_single_task_pulls_prerequisites() {
        let graph = TaskGraph::builtin().unwrap();
        let order = resolve_execution_order(&graph, &names(&["test"])).unwrap();
        assert_eq!(order, names(&["clean", "logging", "test"]));

        let order = resolve_execution_order(&graph, &names(&["clean"])).unwrap();
        assert_eq!(order, names(&["clean"]));
    }

    #[test]
    fn test_shared_prerequisites_run_once() {
        let graph = TaskGraph::builtin().unwrap();
        let order = resolve_execution_order(&graph, &names(&["test", "serve", "test"])).unwrap();
        assert_eq!(order, names(&["clean", "logging", "test", "serve"]));
    }

    #[test]
    fn test_unknown_target_is_rejected() {
        let graph = TaskGraph::builtin().unwrap();
        let err = resolve_execution_order(&graph, &names(&["build"])).unwrap_err();
        assert!(err.to_string().contains("Task 'build' not found"));
    }

    #[test]
    fn test_diamond_dependencies_keep_declaration_order() {
        let graph = TaskGraph::new(vec![
            TaskDefinition::new("base", "", &[], TaskAction::Alias),
            TaskDefinition::new("left", "", &["base"], TaskAction::Alias),
            TaskDefinition::new("right", "", &["base"], TaskAction::Alias),
            TaskDefinition::new("top", "", &["left", "right"], TaskAction::Alias),
        ])
        .unwrap();
        let order = resolve_execution_order(&graph, &names(&["top"])).unwrap();
        assert_eq!(order, names(&["base", "left", "right", "top"]));
    }
}
