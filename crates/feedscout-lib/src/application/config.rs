//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::graph::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, DiscoveryLimits};
use crate::networking::NetworkingConfig;
use crate::primitives::*;
use clap::Args;
use std::path::PathBuf;

/// Default configuration values
pub mod defaults {
    /// Warnings and errors only
    pub const LOG_LEVEL: u8 = 1;
    pub const NET_TIMEOUT: u64 = 30;
    pub const MAX_DEPTH: usize = super::DEFAULT_MAX_DEPTH;
    pub const MAX_NODES: usize = super::DEFAULT_MAX_NODES;
}

/// Application configuration structure
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// TOML file listing the feeds to query
    #[arg(long, global = true, env = "FEEDSCOUT_FEEDS_FILE")]
    pub feeds_file: Option<PathBuf>,

    /// Extra v3 feed URL (repeatable or comma separated)
    #[arg(long = "feed", global = true, env = "FEEDSCOUT_FEED", value_delimiter = ',')]
    pub feeds: Vec<String>,

    /// Feed request timeout in seconds
    #[arg(
        short,
        long,
        global = true,
        env = "FEEDSCOUT_NET_TIMEOUT",
        default_value_t = defaults::NET_TIMEOUT
    )]
    pub net_timeout: u64,

    /// Dependency edges deeper than this are recorded but not expanded
    #[arg(
        long,
        global = true,
        env = "FEEDSCOUT_MAX_DEPTH",
        default_value_t = defaults::MAX_DEPTH
    )]
    pub max_depth: usize,

    /// Stop discovery once this many edges are known
    #[arg(
        long,
        global = true,
        env = "FEEDSCOUT_MAX_NODES",
        default_value_t = defaults::MAX_NODES
    )]
    pub max_nodes: usize,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(
        long,
        global = true,
        env = "FEEDSCOUT_LOG_LEVEL",
        default_value_t = defaults::LOG_LEVEL
    )]
    pub log_level: u8,

    /// Log format (text, json)
    #[arg(
        long,
        global = true,
        env = "FEEDSCOUT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(
        long,
        global = true,
        env = "FEEDSCOUT_LOG_OUTPUT",
        value_enum,
        default_value_t = LogOutput::Stderr
    )]
    pub log_output: LogOutput,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feeds_file: None,
            feeds: Vec::new(),
            net_timeout: defaults::NET_TIMEOUT,
            max_depth: defaults::MAX_DEPTH,
            max_nodes: defaults::MAX_NODES,
            log_level: defaults::LOG_LEVEL,
            log_format: LogFormat::Text,
            log_output: LogOutput::Stderr,
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig from AppConfig and the resolved colour decision
    pub fn to_logger_config(&self, ansi: bool) -> LoggerConfig {
        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            ansi,
        }
    }

    pub fn networking_config(&self) -> NetworkingConfig {
        NetworkingConfig {
            timeout_seconds: self.net_timeout,
            ..NetworkingConfig::default()
        }
    }

    pub fn limits(&self) -> DiscoveryLimits {
        DiscoveryLimits {
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        }
    }

    /// Validate the final configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let zeroed = [
            ("net-timeout", self.net_timeout == 0),
            ("max-depth", self.max_depth == 0),
            ("max-nodes", self.max_nodes == 0),
        ];

        if let Some((name, _)) = zeroed.iter().find(|(_, is_zero)| *is_zero) {
            return Err(ConfigError::ValidationFailed {
                reason: format!("--{name} must be greater than zero"),
            });
        }

        if self.log_level > 4 {
            return Err(ConfigError::ValidationFailed {
                reason: format!("--log-level must be 0-4, got {}", self.log_level),
            });
        }

        if let Some(url) = self.feeds.iter().find(|url| url.trim().is_empty()) {
            return Err(ConfigError::ValidationFailed {
                reason: format!("empty feed URL in --feed list: {url:?}"),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("config.test.rs");
}
