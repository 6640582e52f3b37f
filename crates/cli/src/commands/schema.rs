use anyhow::Result;
use galen_runner_core::configs::runner::RunnerConfig;

pub fn execute() -> Result<()> {
    let schema = RunnerConfig::json_schema()
        .map_err(|e| anyhow::anyhow!("Failed to generate config schema: {}", e))?;
    println!("{}", schema);
    Ok(())
}
