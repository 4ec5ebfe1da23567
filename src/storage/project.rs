//! Project management
//!
//! Handles project initialization and provides access to the task store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::{Config, TaskStore};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Not in a taskgraph project. Run 'taskgraph init' first.")]
    NotInProject,

    #[error("Failed to create project: {0}")]
    CreateFailed(String),
}

const DEFAULT_CONFIG: &str = r#"# taskgraph configuration

# Weights for `taskgraph order`
[ranking]
# urgent = 100.0
# high = 75.0
# medium = 50.0
# low = 25.0
# due_date_weight = 50.0
# due_date_horizon_days = 14
# dependent_weight = 10.0

# Limits for `taskgraph validate`
[validation]
# max_dependencies = 10
# blocked_ratio = 0.5
"#;

/// A taskgraph project
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(".taskgraph").is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    ///
    /// Fails if the directory already holds a project.
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let data_dir = root.join(".taskgraph");

        if data_dir.is_dir() {
            return Err(ProjectError::AlreadyExists(root).into());
        }
        if data_dir.exists() {
            return Err(ProjectError::CreateFailed(format!(
                "{} exists and is not a directory",
                data_dir.display()
            ))
            .into());
        }

        fs::create_dir_all(&data_dir).with_context(|| {
            format!(
                "Failed to create .taskgraph directory: {}",
                data_dir.display()
            )
        })?;

        let config_path = data_dir.join("config.toml");
        fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

        let tasks_path = data_dir.join("tasks.jsonl");
        fs::write(&tasks_path, "")
            .with_context(|| format!("Failed to write task store: {}", tasks_path.display()))?;

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the task store
    pub fn task_store(&self) -> TaskStore {
        TaskStore::for_project(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RankingWeights, ValidationThresholds};
    use tempfile::TempDir;

    #[test]
    fn init_creates_structure() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();
        let data_dir = project.root().join(".taskgraph");

        assert!(data_dir.is_dir());
        assert!(data_dir.join("config.toml").is_file());
        assert!(data_dir.join("tasks.jsonl").is_file());
    }

    #[test]
    fn default_config_parses_to_defaults() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        assert_eq!(project.config().project.ranking, RankingWeights::default());
        assert_eq!(
            project.config().project.validation,
            ValidationThresholds::default()
        );
    }

    #[test]
    fn init_twice_fails() {
        let dir = TempDir::new().unwrap();

        Project::init(dir.path()).unwrap();
        let err = Project::init(dir.path()).unwrap_err();

        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn open_existing_project() {
        let dir = TempDir::new().unwrap();
        Project::init(dir.path()).unwrap();

        let project = Project::open(dir.path()).unwrap();
        assert_eq!(project.root(), dir.path());
    }

    #[test]
    fn open_non_project_fails() {
        let dir = TempDir::new().unwrap();
        let result = Project::open(dir.path());

        assert!(result.is_err());
    }

    #[test]
    fn task_store_is_accessible() {
        let dir = TempDir::new().unwrap();
        let project = Project::init(dir.path()).unwrap();

        let store = project.task_store();
        assert!(store.path().ends_with("tasks.jsonl"));
        assert!(store.read_all().unwrap().is_empty());
    }
}
