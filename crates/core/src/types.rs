use std::path::PathBuf;

use thiserror::Error;

/// The main error type for galen-runner operations
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("Glob error: {0}")]
    Glob(String),

    #[error("Failed to clean '{}': {source}", .path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to execute command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Galen reported failed tests: {}", .0.join(", "))]
    SuitesFailed(Vec<String>),
}

impl RunnerError {
    /// Whether this error stops dependent tasks from running.
    ///
    /// Failing suites still leave reports behind worth serving, so only
    /// [`RunnerError::SuitesFailed`] lets the task graph continue.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RunnerError::SuitesFailed(_))
    }
}

/// Result type alias for galen-runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suites_failed_message_lists_paths_in_order() {
        let err = RunnerError::SuitesFailed(vec![
            "b.spec.js".to_string(),
            "nested/c.spec.js".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Galen reported failed tests: b.spec.js, nested/c.spec.js"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_clean_error_is_fatal() {
        let err = RunnerError::Clean {
            path: PathBuf::from("reports"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("reports"));
    }
}
