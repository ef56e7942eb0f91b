//! Environment variable handling for terminal output
//!
//! Reads the conventional colour switches so log output stays plain in CI
//! and when the user opts out.

use crate::primitives::ConfigError;
use serde::Deserialize;

/// Environment variables that affect application behavior
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// NO_COLOR environment variable (any non-empty value = disable color)
    pub no_color: Option<String>,
    /// FORCE_COLOR environment variable (0/false = disable, 1/2/3/true = enable)
    pub force_color: Option<String>,
    /// CI environment variable (any value = CI mode)
    pub ci: Option<String>,
}

impl EnvironmentConfig {
    /// Load environment configuration from current environment
    pub fn load() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    /// Whether log output should carry ANSI colour.
    ///
    /// Precedence: CI < NO_COLOR < FORCE_COLOR
    pub fn use_ansi(&self) -> bool {
        let mut ansi = self.ci.is_none();

        if self.no_color.as_deref().is_some_and(|value| !value.is_empty()) {
            ansi = false;
        }

        match self.force_color.as_deref() {
            Some("0" | "false") => false,
            Some("1" | "2" | "3" | "true") => true,
            _ => ansi,
        }
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}
