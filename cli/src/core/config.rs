//! # gzbundle Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates gzbundle's configuration. Only two
//! things are configurable: the default number of parallel jobs, and which
//! programs to run for compression and bundling.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.gzbundle.toml` in the current directory or an ancestor
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/gzbundle/config.toml`)
//! 3. Default values defined in the code
//!
//! Tool paths may use `~`, which is expanded after merging. The merged result
//! is validated before use.
//!
//! ```toml
//! [jobs]
//! parallel = 4
//!
//! [tools]
//! gzip = "~/bin/gzip"
//! tar = "gtar"
//! ```
//!
use crate::common::archive::Toolchain;
use crate::core::error::{GzbundleError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Effective configuration after all sources are layered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub jobs: JobsConfig,
    pub tools: ToolsConfig,
}

/// Scheduling defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsConfig {
    /// Parallel jobs when neither `-S` nor `-P` is given.
    pub parallel: usize,
}

/// External programs (can use ~).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConfig {
    pub gzip: String,
    pub tar: String,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            gzip: default_gzip(),
            tar: default_tar(),
        }
    }
}

/// One configuration file as written. Keys left out do not override lower layers.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    #[serde(default)]
    jobs: JobsLayer,
    #[serde(default)]
    tools: ToolsLayer,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct JobsLayer {
    parallel: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ToolsLayer {
    gzip: Option<String>,
    tar: Option<String>,
}

impl ConfigLayer {
    fn apply_to(self, config: &mut Config) {
        if let Some(parallel) = self.jobs.parallel {
            config.jobs.parallel = parallel;
        }
        if let Some(gzip) = self.tools.gzip {
            config.tools.gzip = gzip;
        }
        if let Some(tar) = self.tools.tar {
            config.tools.tar = tar;
        }
    }
}

impl Config {
    pub fn toolchain(&self) -> Toolchain {
        Toolchain {
            gzip: self.tools.gzip.clone(),
            tar: self.tools.tar.clone(),
        }
    }
}

fn default_parallel() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
fn default_gzip() -> String {
    "gzip".to_string()
}
fn default_tar() -> String {
    "tar".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".gzbundle.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config, project_config);
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<ConfigLayer>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "gzbundle", "gzbundle") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<ConfigLayer>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.gzbundle.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Defaults, then the user file, then the project file. Later layers win
/// for every key they set, even when the value equals the default.
fn merge_configs(user: Option<ConfigLayer>, project: Option<ConfigLayer>) -> Config {
    let mut config = Config::default();
    for layer in [user, project].into_iter().flatten() {
        layer.apply_to(&mut config);
    }
    config
}

fn expand_config_paths(config: &mut Config) {
    config.tools.gzip = shellexpand::tilde(&config.tools.gzip).into_owned();
    config.tools.tar = shellexpand::tilde(&config.tools.tar).into_owned();
    debug!(
        "Expanded tool paths: gzip={}, tar={}",
        config.tools.gzip, config.tools.tar
    );
}

fn validate_config(config: &Config) -> Result<()> {
    if config.jobs.parallel == 0 {
        return Err(anyhow!(GzbundleError::Config(
            "jobs.parallel must be greater than 0".to_string()
        )));
    }
    for (name, program) in [("gzip", &config.tools.gzip), ("tar", &config.tools.tar)] {
        if program.trim().is_empty() {
            return Err(anyhow!(GzbundleError::Config(format!(
                "tools.{} cannot be empty",
                name
            ))));
        }
    }
    Ok(())
}
