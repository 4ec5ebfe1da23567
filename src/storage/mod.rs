//! # Storage Layer
//!
//! Persistence for taskgraph projects using plain, diffable files.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one JSON per line) | `.taskgraph/tasks.jsonl` |
//! | Config | TOML | `.taskgraph/config.toml` |
//!
//! [`TaskStore`] uses file locking (`fs2`) for concurrent access, and full
//! rewrites are atomic (temp file + rename).
//!
//! ## Key Types
//!
//! - [`Project`] - Entry point for accessing a taskgraph project
//! - [`TaskStore`] - Read/write tasks as JSONL
//! - [`Config`] - Project and global configuration

mod config;
mod jsonl;
mod project;

pub use config::{Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig};
pub use jsonl::TaskStore;
pub use project::{Project, ProjectError};
