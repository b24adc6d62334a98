use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hrm_auth::config::DEFAULT_API_URL;
use hrm_auth::storage::STATE_DIR;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub server: Option<String>,
    pub format: Option<String>,
}

impl ProfileConfig {
    /// Stored default output format, if it names a known one.
    pub fn output_format(&self) -> Option<OutputFormat> {
        let format = self.format.as_deref()?;
        <OutputFormat as clap::ValueEnum>::from_str(format, true).ok()
    }

    /// Applies `config set <key> <value>`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => self.server = Some(value.to_string()),
            "format" => {
                <OutputFormat as clap::ValueEnum>::from_str(value, true).map_err(|_| {
                    anyhow::anyhow!("Unknown format: {value}. Valid formats: json, table, csv, tsv")
                })?;
                self.format = Some(value.to_ascii_lowercase());
            }
            other => anyhow::bail!("Unknown config key: {other}. Valid keys: server, format"),
        }
        Ok(())
    }
}

pub type ConfigFile = BTreeMap<String, ProfileConfig>;

fn config_path() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(STATE_DIR);
    Ok(dir.join("config.toml"))
}

fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(cfg)
}

fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    all.insert(profile.to_string(), config.clone());
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(&all)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all_from(&config_path()?)?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path()?, profile, config)
}

/// Picks the API URL: `--server` / `HRM_API_URL`, then the profile, then the
/// built-in default.
pub fn resolve_server(cli_server: Option<&str>, profile: &ProfileConfig) -> String {
    cli_server
        .or(profile.server.as_deref())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}
