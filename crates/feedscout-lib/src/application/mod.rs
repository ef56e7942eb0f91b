//! Application layer modules
//!
//! Organizes CLI interface, configuration management, and command dispatch.

pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod feeds;
pub mod loader;

// Re-export main types for convenience
pub use cli::{Cli, CliConfig, Commands, OutputFormat};
pub use commands::{DiscoveryReport, execute_command, run_discovery};
pub use config::AppConfig;
pub use feeds::{FeedsFile, FeedsFileError};
