//! Command-line interface and orchestration for repo-score
//!
//! # Commands
//!
//! - **score**: read repository URLs from a file, run every metric against each
//!   repository, and print one result per repository in input order
//! - **init**: write the default configuration file
//! - **validate**: check a configuration file
//!
//! The `run` function parses the arguments with clap and routes to the matching
//! handler. All console interaction goes through the [`Host`] trait so commands
//! can be exercised in tests without touching the real process.
//!
//! Configuration is a TOML file (`repo-score.toml` by default) holding work bounds,
//! the per-metric deadline, the concurrency level, and the net score weights.

mod common;
mod config;
mod host;
mod init;
mod run;
mod score;
mod validate;

pub use common::{ColorMode, LogLevel, OutputFormat};
pub use config::{Config, DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_TOML};
pub use host::Host;
#[cfg(any(debug_assertions, test))]
pub use host::TestHost;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use score::{ScoreArgs, read_url_file, score_repositories};
pub use validate::{ValidateArgs, validate_config};
