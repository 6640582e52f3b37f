//! Galen Runner Core Library
//!
//! Core library for the `galen-runner` tool. It runs suites of Galen layout
//! tests one after another, collects the failures and serves the generated
//! HTML reports with directory listings.
//!
//! ## Architecture
//!
//! - [`project_manager`] - High-level interface used by the CLI
//! - [`tasks`] - Built-in tasks and the task dependency graph
//! - [`execution`] - Dependency ordering, Galen invocation and the task runner
//! - [`discovery`] - Finding spec files that match the suites glob
//! - [`server`] - Static report server
//! - [`listing`] - HTML directory listings
//! - [`configs`] - Configuration file parsing
//! - [`results`] - Result types for runner operations
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
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
//! manager.run_tasks(&["test".to_string()]).await?;
//! # Ok(())
//! # }
//! ```

pub mod configs;
pub mod discovery;
pub mod execution;
pub mod listing;
pub mod project_manager;
pub mod results;
pub mod server;
pub mod tasks;
pub mod types;

// Re-export the main types for easier usage
pub use project_manager::{ProjectManager, ProjectManagerConfig};
pub use types::{RunnerError, RunnerResult};
