use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

pub fn workspace_dir() -> anyhow::Result<PathBuf> {
    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .context("failed to locate workspace")?
        .stdout;
    let cargo_path = std::str::from_utf8(&output)
        .context("failed to read cargo locate-project output")?;
    Path::new(cargo_path.trim())
        .parent()
        .map(Path::to_path_buf)
        .context("workspace manifest has no parent directory")
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    let path = workspace_dir()?.join(config_name);
    let config = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<Map<String, Value>>(&config)
        .with_context(|| format!("failed to parse {}", config_name))
}

pub fn load_env() -> anyhow::Result<Map<String, Value>> {
    let secrets = std::fs::read_to_string(workspace_dir()?.join("Secrets.toml"))
        .context("failed to read Secrets.toml")?;

    toml::from_str::<Map<String, Value>>(&secrets)
        .context("failed to parse Secrets.toml")
}

/// Reads `[section] key = "..."` from a parsed config.
pub fn get_str(
    config: &Map<String, Value>,
    section: &str,
    key: &str,
) -> anyhow::Result<String> {
    Ok(config
        .get(section)
        .with_context(|| format!("failed to get {} config", section))?
        .get(key)
        .with_context(|| format!("failed to load {} config", key))?
        .as_str()
        .with_context(|| format!("failed to parse {} config", key))?
        .to_string())
}

/// Reads a top-level string, as stored in `Secrets.toml`.
pub fn get_secret(
    secrets: &Map<String, Value>,
    key: &str,
) -> anyhow::Result<String> {
    Ok(secrets
        .get(key)
        .with_context(|| format!("{} was not found", key))?
        .as_str()
        .with_context(|| format!("{} is not a string", key))?
        .to_string())
}
