//! Azure DevOps Artifacts feeds
//!
//! These feeds track packages by guid, so there is no per-version manifest
//! URL to build. Resolution takes two calls: a package-name query that yields
//! the package's versions link, then the versions listing, which carries the
//! declared dependencies of every version.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use super::FeedError;
use super::sanitize::sanitize;
use crate::networking::HttpClient;
use crate::primitives::{AuthHeader, DependencyEdge, PackageCoordinate};

/// Packaging REST API host
pub const DEFAULT_API_BASE: &str = "https://feeds.dev.azure.com";

const API_VERSION: &str = "7.0";

/// Characters left verbatim in the `packageNameQuery` value
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

static HOSTED_FEED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https://pkgs\.dev\.azure\.com/(?P<organization>[^/]+)/(?P<project>[^/]+)/_packaging/(?P<feed>[^/]+)/nuget/v3/index\.json",
    )
    .expect("hosted feed pattern is valid")
});

/// Organization, project and feed identifiers embedded in a feed URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedFeedLocation {
    pub organization: String,
    pub project: String,
    pub feed_id: String,
}

impl HostedFeedLocation {
    /// Recognize a project-scoped Azure Artifacts v3 index URL
    pub fn parse(feed_url: &str) -> Option<Self> {
        let captures = HOSTED_FEED_URL.captures(feed_url)?;
        Some(Self {
            organization: captures["organization"].to_string(),
            project: captures["project"].to_string(),
            feed_id: captures["feed"].to_string(),
        })
    }
}

// Listings are loosely typed: any field, and any array element, may be null.

#[derive(Debug, Deserialize)]
struct PackageList {
    #[serde(default)]
    value: Option<Vec<Option<PackageEntry>>>,
}

#[derive(Debug, Deserialize)]
struct PackageEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "_links", default)]
    links: Option<PackageLinks>,
}

#[derive(Debug, Deserialize)]
struct PackageLinks {
    #[serde(default)]
    versions: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(default)]
    href: Option<String>,
}

impl PackageEntry {
    fn versions_href(self) -> Option<String> {
        self.links?.versions?.href
    }
}

#[derive(Debug, Deserialize)]
struct VersionList {
    #[serde(default)]
    value: Option<Vec<Option<VersionEntry>>>,
}

#[derive(Debug, Deserialize)]
struct VersionEntry {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dependencies: Option<Vec<Option<VersionDependency>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionDependency {
    #[serde(default)]
    package_name: Option<String>,
    #[serde(default)]
    version_range: Option<String>,
}

impl VersionDependency {
    fn into_edge(self) -> Option<DependencyEdge> {
        match (self.package_name, self.version_range) {
            (Some(name), Some(range)) => Some(DependencyEdge::new(name, range)),
            (name, range) => {
                debug!(?name, ?range, "skipping incomplete dependency entry");
                None
            }
        }
    }
}

/// Adapter for Azure DevOps Artifacts feeds
pub struct HostedArtifactFeed<H> {
    http: Arc<H>,
    location: HostedFeedLocation,
    auth: Option<AuthHeader>,
    api_base: String,
}

impl<H: HttpClient> HostedArtifactFeed<H> {
    pub fn new(http: Arc<H>, location: HostedFeedLocation, auth: Option<AuthHeader>) -> Self {
        Self {
            http,
            location,
            auth,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the packaging API at another host (staging/testing)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn location(&self) -> &HostedFeedLocation {
        &self.location
    }

    /// Step one: the package-name query for `package_id`
    pub fn packages_query_url(&self, package_id: &str) -> String {
        format!(
            "{}/{}/{}/_apis/packaging/Feeds/{}/packages?protocolType=nuget&packageNameQuery={}&api-version={}",
            self.api_base,
            self.location.organization,
            self.location.project,
            self.location.feed_id,
            utf8_percent_encode(package_id, QUERY_VALUE),
            API_VERSION
        )
    }

    /// Declared dependencies of `coordinate`, empty when either lookup step finds nothing
    pub async fn fetch(
        &self,
        coordinate: &PackageCoordinate,
    ) -> Result<Vec<DependencyEdge>, FeedError> {
        let Some(versions_url) = self.versions_link(&coordinate.name).await? else {
            return Ok(Vec::new());
        };

        let Some(listing) = self.get_json::<VersionList>(&versions_url).await? else {
            return Ok(Vec::new());
        };

        let edges: Vec<DependencyEdge> = listing
            .value
            .into_iter()
            .flatten()
            .flatten()
            .filter(|entry| entry.version.as_deref() == Some(coordinate.version.as_str()))
            .flat_map(|entry| entry.dependencies.into_iter().flatten())
            .filter_map(|dependency| match dependency {
                Some(dependency) => dependency.into_edge(),
                None => {
                    debug!(package = %coordinate, "skipping null dependency entry");
                    None
                }
            })
            .collect();

        if edges.is_empty() {
            debug!(package = %coordinate, "no dependencies listed for version");
        }

        Ok(edges)
    }

    /// Step one: find the versions link of the exactly-named package
    async fn versions_link(&self, package_id: &str) -> Result<Option<String>, FeedError> {
        let url = self.packages_query_url(package_id);

        let Some(packages) = self.get_json::<PackageList>(&url).await? else {
            return Ok(None);
        };

        // Later exact matches override earlier ones
        let link = packages
            .value
            .into_iter()
            .flatten()
            .flatten()
            .filter(|entry| entry.name.as_deref() == Some(package_id))
            .filter_map(PackageEntry::versions_href)
            .last();

        if link.is_none() {
            debug!(package_id, "no exact package match with a versions link");
        }

        Ok(link)
    }

    /// GET and decode a JSON listing; `None` for non-success statuses
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, FeedError> {
        let response = self
            .http
            .get(url, self.auth.as_ref())
            .await
            .map_err(|source| FeedError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.is_success() {
            debug!(url, status = response.status, "lookup returned no data");
            return Ok(None);
        }

        let body = sanitize(&response.body);
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| FeedError::UnparseableResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    include!("hosted.test.rs");
}
