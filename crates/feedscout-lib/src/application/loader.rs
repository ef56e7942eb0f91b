//! Configuration loading
//!
//! `.env.local` and `.env` are folded into the process environment first so
//! that clap's `env = "FEEDSCOUT_*"` fallbacks see them; CLI arguments win
//! over everything.

use crate::primitives::ConfigError;
use clap::Parser;
use std::path::Path;
use tracing::trace;

use super::cli::{Cli, CliConfig};

/// Env files consulted in order; earlier files take precedence
pub const ENV_FILES: &[&str] = &[".env.local", ".env"];

impl CliConfig {
    /// Load config: defaults -> .env -> env vars -> CLI
    pub fn load() -> Result<Self, ConfigError> {
        load_env_files(Path::new("."))?;

        let config = CliConfig::from(Cli::parse());
        config.app_config.validate()?;

        Ok(config)
    }
}

/// Load the env files under `dir` that exist, without overriding variables
/// already set
pub fn load_env_files(dir: &Path) -> Result<(), ConfigError> {
    for file in ENV_FILES {
        let path = dir.join(file);
        match dotenvy::from_path(&path) {
            Ok(()) => trace!(file = %path.display(), "loaded env file"),
            Err(e) if e.not_found() => {}
            Err(e) => {
                return Err(ConfigError::EnvFileError {
                    file: path.display().to_string(),
                    source: e,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    include!("loader.test.rs");
}
