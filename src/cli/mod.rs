//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `status` |
//! | Task | Work item management | `task add`, `task dep`, `task done` |
//! | Query | Dependency analysis | `ready`, `blocked`, `order`, `critical-path` |
//! | Checks | Structural problems | `cycles`, `validate` |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! Without the flag, `default_format` from the global config applies.
//!
//! ## Logging
//!
//! `--verbose` (or `-v`) turns on debug events on stderr; otherwise
//! `TASKGRAPH_LOG` selects the level:
//! ```bash
//! TASKGRAPH_LOG=info taskgraph order
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod query;
mod task;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use task::TaskCommands;
