use clap::{Parser, Subcommand, ValueEnum};

use super::config::AppConfig;

/// feedscout CLI - transitive dependency discovery across NuGet feeds
#[derive(Debug, Clone, Parser)]
#[command(name = "feedscout")]
#[command(about = "Enumerate every package a NuGet package version depends on")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    /// feedscout commands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            app_config: cli.config,
            command: cli.command,
        }
    }
}

/// Available feedscout commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Discover the transitive dependencies of a package version
    Discover {
        /// Package id, e.g. Newtonsoft.Json
        package: String,

        /// Exact package version to start from
        #[arg(id = "package_version", value_name = "VERSION")]
        version: String,

        /// Result format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List configured feeds and the protocol adapter serving each
    Feeds,
}

/// How `discover` prints its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `name range` line per dependency
    Text,
    /// A single JSON document
    Json,
}

#[cfg(test)]
mod tests {
    include!("cli.test.rs");
}
