//! feedscout primitives - core types, errors, and coordination
//!
//! Shared types used by every layer: package coordinates and dependency
//! edges flow through the graph builder, feed descriptors configure the
//! adapters, and the config/logger errors chain into the application layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Protocol version accepted by the feed adapters
pub const SUPPORTED_PROTOCOL_VERSION: &str = "v3";

// ============================================================================
// DOMAIN TYPES
// ============================================================================

/// A concrete, resolvable package state: id plus exact version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageCoordinate {
    pub name: String,
    pub version: String,
}

impl PackageCoordinate {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// A declared dependency of some package.
///
/// Equality and hashing use the literal range text, so `[1.0.0, )` and
/// `[1.0.0]` for the same package are different edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub package_name: String,
    pub version_range: String,
}

impl DependencyEdge {
    pub fn new(package_name: impl Into<String>, version_range: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            version_range: version_range.into(),
        }
    }

    /// True for entries that carry no package name
    pub fn is_empty(&self) -> bool {
        self.package_name.trim().is_empty()
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.package_name, self.version_range)
    }
}

/// Opaque credential header sent with every request to a feed
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    name: String,
    value: String,
}

impl AuthHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `Authorization: <value>`
    pub fn authorization(value: impl Into<String>) -> Self {
        Self::new("Authorization", value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

// Credentials never reach the logs
impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// A remote feed as supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedDescriptor {
    pub repository_url: String,
    pub auth_header: Option<AuthHeader>,
    pub protocol_version: String,
}

impl FeedDescriptor {
    /// Create a v3 descriptor without credentials
    pub fn v3(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            auth_header: None,
            protocol_version: SUPPORTED_PROTOCOL_VERSION.to_string(),
        }
    }

    pub fn with_auth(mut self, auth_header: AuthHeader) -> Self {
        self.auth_header = Some(auth_header);
        self
    }

    pub fn is_supported(&self) -> bool {
        self.protocol_version == SUPPORTED_PROTOCOL_VERSION
    }
}

// ============================================================================
// LOGGER CONFIGURATION TYPES
// ============================================================================

/// Available log output streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stderr,
    Stdout,
}

/// Output formats for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[value(alias = "txt", alias = "plain")]
    Text,
    Json,
}

/// Log levels for structured logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    /// Convert verbosity level from AppConfig to LogLevel
    pub fn from_verbosity(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            4.. => LogLevel::Trace,
        }
    }

    /// Directive name understood by `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warning => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Logger configuration resolved from AppConfig and the environment
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    pub ansi: bool,
}

// ============================================================================
// STRUCTURED ERROR TYPES
// ============================================================================

/// Application configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load environment file '{file}': {source}")]
    EnvFileError {
        file: String,
        source: dotenvy::Error,
    },

    #[error("Failed to parse environment variables: {source}")]
    EnvironmentParsingFailed {
        #[from]
        source: envy::Error,
    },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },
}

/// Logger initialization errors
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Failed to initialize tracing subscriber: {reason}")]
    InitializationFailed { reason: String },

    #[error("Logger already initialized")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
