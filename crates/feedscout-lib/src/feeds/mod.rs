//! # Feeds Module
//!
//! Protocol adapters that turn a package coordinate into its declared
//! dependency edges.
//!
//! ## Modules
//!
//! - [`standard`] - flat-container `.nuspec` manifests (nuget.org and most v3 feeds)
//! - [`hosted`] - Azure DevOps Artifacts two-step guid lookup
//! - [`sanitize`] - body cleanup shared by both adapters

pub mod hosted;
pub mod sanitize;
pub mod standard;

pub use hosted::{HostedArtifactFeed, HostedFeedLocation};
pub use standard::StandardFeed;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::graph::DependencySource;
use crate::networking::{HttpClient, NetworkingError};
use crate::primitives::{DependencyEdge, FeedDescriptor, PackageCoordinate};

/// Failure of a single feed lookup.
///
/// These never abort a traversal; [`FeedSet`] logs them and treats the
/// branch as having no dependencies.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        source: NetworkingError,
    },

    #[error("Unparseable feed response from {url}: {reason}")]
    UnparseableResponse { url: String, reason: String },
}

/// Which protocol a feed URL is served with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    FlatContainer,
    AzureArtifacts,
}

impl FeedKind {
    pub fn detect(feed_url: &str) -> Self {
        if HostedFeedLocation::parse(feed_url).is_some() {
            FeedKind::AzureArtifacts
        } else {
            FeedKind::FlatContainer
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedKind::FlatContainer => write!(f, "flat-container"),
            FeedKind::AzureArtifacts => write!(f, "azure-artifacts"),
        }
    }
}

/// A feed with its protocol variant chosen
pub enum FeedAdapter<H> {
    Standard(StandardFeed<H>),
    Hosted(HostedArtifactFeed<H>),
}

impl<H: HttpClient> FeedAdapter<H> {
    /// Pick the adapter variant from the descriptor's URL shape
    pub fn for_descriptor(http: Arc<H>, descriptor: &FeedDescriptor) -> Self {
        let auth = descriptor.auth_header.clone();

        match HostedFeedLocation::parse(&descriptor.repository_url) {
            Some(location) => FeedAdapter::Hosted(HostedArtifactFeed::new(http, location, auth)),
            None => FeedAdapter::Standard(StandardFeed::new(
                http,
                descriptor.repository_url.clone(),
                auth,
            )),
        }
    }

    pub fn kind(&self) -> FeedKind {
        match self {
            FeedAdapter::Standard(_) => FeedKind::FlatContainer,
            FeedAdapter::Hosted(_) => FeedKind::AzureArtifacts,
        }
    }

    pub async fn fetch(
        &self,
        coordinate: &PackageCoordinate,
    ) -> Result<Vec<DependencyEdge>, FeedError> {
        match self {
            FeedAdapter::Standard(feed) => feed.fetch(coordinate).await,
            FeedAdapter::Hosted(feed) => feed.fetch(coordinate).await,
        }
    }
}

/// The adapters one traversal queries, built once from configuration
pub struct FeedSet<H> {
    adapters: Vec<FeedAdapter<H>>,
}

impl<H: HttpClient> FeedSet<H> {
    /// Build adapters for every supported (v3) descriptor
    pub fn from_descriptors(http: Arc<H>, descriptors: &[FeedDescriptor]) -> Self {
        let adapters = descriptors
            .iter()
            .filter(|descriptor| {
                let supported = descriptor.is_supported();
                if !supported {
                    debug!(
                        url = %descriptor.repository_url,
                        protocol = %descriptor.protocol_version,
                        "skipping feed with unsupported protocol"
                    );
                }
                supported
            })
            .map(|descriptor| FeedAdapter::for_descriptor(http.clone(), descriptor))
            .collect();

        Self { adapters }
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Edges from every feed, concatenated in feed order.
    ///
    /// A failing feed contributes nothing and does not affect the others.
    pub async fn fetch_all(&self, coordinate: &PackageCoordinate) -> Vec<DependencyEdge> {
        let mut edges = Vec::new();

        for adapter in &self.adapters {
            match adapter.fetch(coordinate).await {
                Ok(found) => edges.extend(found),
                Err(error) => warn!(
                    package = %coordinate,
                    feed = %adapter.kind(),
                    %error,
                    "feed lookup failed, treating branch as empty"
                ),
            }
        }

        edges
    }
}

impl<H: HttpClient> DependencySource for FeedSet<H> {
    async fn dependencies(&self, coordinate: &PackageCoordinate) -> Vec<DependencyEdge> {
        self.fetch_all(coordinate).await
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
