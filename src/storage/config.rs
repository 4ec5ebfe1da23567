//! Configuration handling for taskgraph
//!
//! Configuration is stored in `.taskgraph/config.toml` (project) and
//! `~/.config/taskgraph/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{RankingWeights, ValidationThresholds};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Weights for `taskgraph order`
    pub ranking: RankingWeights,

    /// Limits for `taskgraph validate`
    pub validation: ValidationThresholds,
}

impl ProjectConfig {
    /// Rejects values the engine cannot use meaningfully
    pub fn check(&self) -> Result<(), ConfigError> {
        let ratio = self.validation.blocked_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ConfigError::Invalid(format!(
                "validation.blocked_ratio must be between 0 and 1, got {}",
                ratio
            )));
        }

        let r = &self.ranking;
        let weights = [
            r.urgent,
            r.high,
            r.medium,
            r.low,
            r.due_date_weight,
            r.dependent_weight,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ConfigError::Invalid(
                "ranking weights must be finite numbers".to_string(),
            ));
        }

        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskgraph", "taskgraph")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration only
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(".taskgraph").join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .check()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;

        Ok(config)
    }

    /// Finds the project root by looking for a `.taskgraph/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Walks up from `start` looking for a `.taskgraph/` directory
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(".taskgraph").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert_eq!(config.project.ranking.dependent_weight, 10.0);
        assert_eq!(config.project.validation.max_dependencies, 10);
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
[ranking]
urgent = 200.0
due_date_horizon_days = 7

[validation]
max_dependencies = 5
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.ranking.urgent, 200.0);
        assert_eq!(config.ranking.due_date_horizon_days, 7);
        assert_eq!(config.ranking.high, 75.0);
        assert_eq!(config.validation.max_dependencies, 5);
        assert_eq!(config.validation.blocked_ratio, 0.5);
    }

    #[test]
    fn parse_empty_project_config() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str("default_format = \"json\"").unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let mut config = ProjectConfig::default();
        config.validation.blocked_ratio = 1.5;

        assert!(matches!(config.check(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn load_project_config_from_disk() {
        let dir = TempDir::new().unwrap();
        let tg_dir = dir.path().join(".taskgraph");
        fs::create_dir_all(&tg_dir).unwrap();
        fs::write(tg_dir.join("config.toml"), "[ranking]\nlow = 1.0\n").unwrap();

        let config = Config::for_project(dir.path()).unwrap();
        assert_eq!(config.project.ranking.low, 1.0);
        assert_eq!(config.project_root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn malformed_project_config_fails() {
        let dir = TempDir::new().unwrap();
        let tg_dir = dir.path().join(".taskgraph");
        fs::create_dir_all(&tg_dir).unwrap();
        fs::write(tg_dir.join("config.toml"), "[ranking\n").unwrap();

        assert!(Config::for_project(dir.path()).is_err());
    }

    #[test]
    fn find_project_root_from_subdir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".taskgraph")).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root_from(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn find_project_root_missing() {
        let dir = TempDir::new().unwrap();
        assert!(Config::find_project_root_from(dir.path()).is_none());
    }
}
