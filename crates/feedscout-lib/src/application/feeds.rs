//! Feed configuration file
//!
//! ```toml
//! [[feeds]]
//! url = "https://pkgs.dev.azure.com/contoso/tools/_packaging/internal/nuget/v3/index.json"
//! authorization_env = "CONTOSO_FEED_AUTH"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use super::config::AppConfig;
use crate::primitives::{AuthHeader, FeedDescriptor, SUPPORTED_PROTOCOL_VERSION};

/// Feed file loading errors
#[derive(Debug, Error)]
pub enum FeedsFileError {
    #[error("Failed to read feeds file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse feeds file: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },

    #[error("Feed {url} expects credentials in ${var}, which is not set")]
    MissingCredential { url: String, var: String },
}

/// Parsed feeds file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedsFile {
    #[serde(default)]
    pub feeds: Vec<FeedEntry>,
}

/// One `[[feeds]]` table
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub url: String,
    #[serde(default = "default_protocol_version")]
    pub protocol_version: String,
    /// Literal `Authorization` header value
    #[serde(default)]
    pub authorization: Option<String>,
    /// Environment variable holding the `Authorization` header value
    #[serde(default)]
    pub authorization_env: Option<String>,
}

fn default_protocol_version() -> String {
    SUPPORTED_PROTOCOL_VERSION.to_string()
}

impl FeedsFile {
    pub fn load(path: &Path) -> Result<Self, FeedsFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| FeedsFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, FeedsFileError> {
        Ok(toml::from_str(contents)?)
    }

    /// Resolve credentials and produce descriptors, using `lookup` for
    /// `authorization_env` references
    pub fn into_descriptors_with(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Vec<FeedDescriptor>, FeedsFileError> {
        self.feeds
            .into_iter()
            .map(|entry| -> Result<FeedDescriptor, FeedsFileError> {
                let authorization = match (&entry.authorization, &entry.authorization_env) {
                    (Some(value), _) => Some(value.clone()),
                    (None, Some(var)) => Some(lookup(var).ok_or_else(|| {
                        FeedsFileError::MissingCredential {
                            url: entry.url.clone(),
                            var: var.clone(),
                        }
                    })?),
                    (None, None) => None,
                };

                Ok(FeedDescriptor {
                    repository_url: entry.url,
                    auth_header: authorization.map(AuthHeader::authorization),
                    protocol_version: entry.protocol_version,
                })
            })
            .collect()
    }

    pub fn into_descriptors(self) -> Result<Vec<FeedDescriptor>, FeedsFileError> {
        self.into_descriptors_with(|var| std::env::var(var).ok())
    }
}

impl AppConfig {
    /// Feeds from the feeds file (if any) followed by the ad-hoc `--feed` URLs
    pub fn feed_descriptors(&self) -> Result<Vec<FeedDescriptor>, FeedsFileError> {
        let mut descriptors = match &self.feeds_file {
            Some(path) => {
                debug!(path = %path.display(), "loading feeds file");
                FeedsFile::load(path)?.into_descriptors()?
            }
            None => Vec::new(),
        };

        descriptors.extend(
            self.feeds
                .iter()
                .map(|url| FeedDescriptor::v3(url.trim())),
        );

        Ok(descriptors)
    }
}

#[cfg(test)]
mod tests {
    include!("feeds.test.rs");
}
