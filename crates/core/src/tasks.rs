//! Task definitions and the task dependency graph
//!
//! The runner knows a small fixed set of tasks (`clean`, `logging`, `test`,
//! `serve` and `default`). They are kept in a [`TaskGraph`] so ordering is
//! resolved the same way regardless of which tasks are requested.

use std::collections::HashMap;

use colored::*;
use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;

use crate::types::{RunnerError, RunnerResult};

pub const CLEAN_TASK: &str = "clean";
pub const LOGGING_TASK: &str = "logging";
pub const TEST_TASK: &str = "test";
pub const SERVE_TASK: &str = "serve";
pub const DEFAULT_TASK: &str = "default";

/// What a task does once its dependencies have completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Delete the reports directory
    CleanReports,
    /// Emit a log line
    Log(String),
    /// Run every matched suite through Galen
    RunSuites,
    /// Serve the reports directory over HTTP
    ServeReports,
    /// Only exists to pull in its dependencies
    Alias,
}

#[derive(Debug, Clone)]
pub struct TaskDefinition {
    pub name: String,
    pub description: String,
    pub dependencies: Vec<String>,
    pub action: TaskAction,
}

impl TaskDefinition {
    pub fn new(name: &str, description: &str, dependencies: &[&str], action: TaskAction) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            action,
        }
    }
}

/// The built-in task set
pub fn builtin_tasks() -> Vec<TaskDefinition> {
    vec![
        TaskDefinition::new(
            CLEAN_TASK,
            "Delete the reports directory",
            &[],
            TaskAction::CleanReports,
        ),
        TaskDefinition::new(
            LOGGING_TASK,
            "Announce the start of a run",
            &[CLEAN_TASK],
            TaskAction::Log("Starting logging task ....".to_string()),
        ),
        TaskDefinition::new(
            TEST_TASK,
            "Run every Galen suite matching the suites glob",
            &[LOGGING_TASK],
            TaskAction::RunSuites,
        ),
        TaskDefinition::new(
            SERVE_TASK,
            "Serve the generated reports over HTTP",
            &[TEST_TASK],
            TaskAction::ServeReports,
        ),
        TaskDefinition::new(
            DEFAULT_TASK,
            "Run the suites and serve their reports",
            &[SERVE_TASK],
            TaskAction::Alias,
        ),
    ]
}

/// Tasks plus the directed graph of their dependencies (task -> dependency)
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<TaskDefinition>,
    graph: DiGraph<String, ()>,
    name_to_node: HashMap<String, NodeIndex>,
}

impl TaskGraph {
    /// Build the graph, rejecting duplicate names, unknown dependencies and cycles
    pub fn new(tasks: Vec<TaskDefinition>) -> RunnerResult<Self> {
        let mut graph = DiGraph::<String, ()>::new();
        let mut name_to_node = HashMap::new();

        for task in &tasks {
            let node_index = graph.add_node(task.name.clone());
            if name_to_node.insert(task.name.clone(), node_index).is_some() {
                return Err(RunnerError::Task(format!(
                    "Task '{}' is defined more than once",
                    task.name
                )));
            }
        }

        for task in &tasks {
            let from_node = name_to_node[&task.name];
            for dep in &task.dependencies {
                let to_node = name_to_node.get(dep).ok_or_else(|| {
                    RunnerError::Task(format!(
                        "Dependency '{}' not found for task '{}'",
                        dep, task.name
                    ))
                })?;
                graph.add_edge(from_node, *to_node, ());
            }
        }

        let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
            .into_iter()
            .filter_map(|component| {
                if component.len() > 1 {
                    let mut cycle = component
                        .iter()
                        .map(|node| graph[*node].clone())
                        .collect::<Vec<_>>();
                    cycle.sort();
                    Some(cycle)
                } else {
                    let node = component[0];
                    if graph.contains_edge(node, node) {
                        Some(vec![graph[node].clone()])
                    } else {
                        None
                    }
                }
            })
            .collect();

        if !cycles.is_empty() {
            cycles.sort();
            let message = cycles
                .into_iter()
                .map(|mut cycle_path| {
                    if let Some(first) = cycle_path.first().cloned() {
                        cycle_path.push(first);
                    }
                    cycle_path.join(" -> ")
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RunnerError::Task(format!(
                "Circular dependency detected: {}",
                message
            )));
        }

        Ok(Self {
            tasks,
            graph,
            name_to_node,
        })
    }

    /// Graph of the built-in tasks
    pub fn builtin() -> RunnerResult<Self> {
        Self::new(builtin_tasks())
    }

    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }

    /// Tasks in definition order
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    /// Direct dependencies of a task, in declaration order
    pub fn dependencies(&self, name: &str) -> RunnerResult<&[String]> {
        self.get(name)
            .map(|t| t.dependencies.as_slice())
            .ok_or_else(|| RunnerError::Task(format!("Task '{}' not found", name)))
    }

    /// Tasks that list `name` as a direct dependency
    pub fn dependents(&self, name: &str) -> Vec<String> {
        let Some(&node) = self.name_to_node.get(name) else {
            return Vec::new();
        };
        let mut dependents: Vec<String> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect();
        dependents.sort();
        dependents
    }
}

/// Get a consistent color for a task name
pub fn get_task_color(task_name: &str) -> Color {
    let hash = task_name
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

    // Jewel tones, kept clear of the red/yellow/green used for status lines
    let colors = [
        Color::TrueColor {
            r: 147,
            g: 112,
            b: 219,
        },
        Color::TrueColor {
            r: 64,
            g: 224,
            b: 208,
        },
        Color::TrueColor {
            r: 255,
            g: 140,
            b: 0,
        },
        Color::TrueColor {
            r: 199,
            g: 21,
            b: 133,
        },
        Color::TrueColor {
            r: 138,
            g: 43,
            b: 226,
        },
    ];

    colors[(hash % colors.len() as u64) as usize]
}
