use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::listing::ListingOptions;
use crate::types::{RunnerError, RunnerResult};

/// Name of the optional config file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "galen-runner.yml";

pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_SUITES_GLOB: &str = "tests/specs/**/*.spec.js";
pub const DEFAULT_PORT: u16 = 3333;
pub const DEFAULT_GALEN_COMMAND: &str = "galen";

/// Browser name that makes the runner pass a PhantomJS binary path to Galen
pub const PHANTOMJS_BROWSER: &str = "phantomjs";

#[derive(Debug, Deserialize, Serialize, JsonSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct RunnerConfig {
    /// Directory the HTML reports are written to, relative to the project root
    pub reports_dir: PathBuf,
    /// Glob matching the Galen suites, relative to the project root
    pub suites_glob: String,
    /// Port the report server listens on
    pub port: u16,
    /// Executable invoked for every suite
    pub galen_command: String,
    /// Execution target, e.g. `phantomjs`
    pub browser: Option<String>,
    /// PhantomJS binary handed to Galen when `browser` is `phantomjs`
    pub phantomjs_binary: Option<PathBuf>,
    pub listing: ListingOptions,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            suites_glob: DEFAULT_SUITES_GLOB.to_string(),
            port: DEFAULT_PORT,
            galen_command: DEFAULT_GALEN_COMMAND.to_string(),
            browser: None,
            phantomjs_binary: None,
            listing: ListingOptions::default(),
        }
    }
}

/// Values supplied on the command line (or their env fallbacks)
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub browser: Option<String>,
    pub phantomjs_binary: Option<PathBuf>,
    pub port: Option<u16>,
}

impl RunnerConfig {
    /// Apply command-line values on top of the file configuration
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(browser) = overrides.browser {
            self.browser = Some(browser);
        }
        if let Some(binary) = overrides.phantomjs_binary {
            self.phantomjs_binary = Some(binary);
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        self
    }

    /// The extra Galen argument selecting the execution target, if any
    pub fn phantomjs_flag(&self) -> RunnerResult<Option<String>> {
        if self.browser.as_deref() != Some(PHANTOMJS_BROWSER) {
            return Ok(None);
        }

        let binary = self.phantomjs_binary.as_ref().ok_or_else(|| {
            RunnerError::Config(
                "browser 'phantomjs' selected but no PhantomJS binary configured \
                 (set phantomjsBinary or PHANTOMJS_BINARY)"
                    .to_string(),
            )
        })?;

        Ok(Some(format!(
            "-Dphantomjs.binary.path={}",
            binary.display()
        )))
    }

    /// JSON Schema describing the config file
    pub fn json_schema() -> RunnerResult<String> {
        let schema = schemars::schema_for!(RunnerConfig);
        serde_json::to_string_pretty(&schema)
            .map_err(|e| RunnerError::Config(format!("Failed to render schema: {}", e)))
    }
}

pub fn parse_runner_config(yaml_str: &str) -> RunnerResult<RunnerConfig> {
    let config: RunnerConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config)
}

/// Load `galen-runner.yml` from the project root, falling back to defaults
pub fn load_runner_config(project_root: &Path) -> RunnerResult<RunnerConfig> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(RunnerConfig::default());
    }

    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        RunnerError::Config(format!(
            "Failed to read config {}: {}",
            config_path.display(),
            e
        ))
    })?;

    parse_runner_config(&content).map_err(|e| {
        RunnerError::Config(format!(
            "Failed to parse config {}: {}",
            config_path.display(),
            e
        ))
    })
}
