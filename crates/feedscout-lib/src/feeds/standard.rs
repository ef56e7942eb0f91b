//! Standard NuGet v3 feeds
//!
//! Dependencies come from the package's `.nuspec` manifest in the feed's
//! flat container: `<feed>-flatcontainer/<id>/<version>/<id>.nuspec`.

use quick_xml::Reader;
use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

use super::FeedError;
use super::sanitize::sanitize;
use crate::networking::HttpClient;
use crate::primitives::{AuthHeader, DependencyEdge, PackageCoordinate};

/// Asset scopes that make a dependency relevant at runtime.
/// Development-only scopes (build, analyzers, contentfiles) are not listed.
pub const ALLOWED_SCOPES: [&str; 4] = ["all", "compile", "native", "runtime"];

/// Structural problems in a manifest body
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("attribute is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("invalid entity in attribute: {0}")]
    Escape(#[from] EscapeError),

    #[error("document has no root element")]
    MissingRoot,

    #[error("element <{element}> is never closed")]
    Unclosed { element: String },
}

/// Adapter for feeds exposing a flat container
pub struct StandardFeed<H> {
    http: Arc<H>,
    feed_url: String,
    auth: Option<AuthHeader>,
}

impl<H: HttpClient> StandardFeed<H> {
    pub fn new(http: Arc<H>, feed_url: impl Into<String>, auth: Option<AuthHeader>) -> Self {
        Self {
            http,
            feed_url: feed_url.into(),
            auth,
        }
    }

    /// Declared dependencies of `coordinate`, empty when the feed has no manifest for it
    pub async fn fetch(
        &self,
        coordinate: &PackageCoordinate,
    ) -> Result<Vec<DependencyEdge>, FeedError> {
        let url = manifest_url(&self.feed_url, &coordinate.name, &coordinate.version);

        let response = self
            .http
            .get(&url, self.auth.as_ref())
            .await
            .map_err(|source| FeedError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.is_success() {
            debug!(%url, status = response.status, "no manifest");
            return Ok(Vec::new());
        }

        let body = sanitize(&response.body);
        parse_manifest(&body).map_err(|e| FeedError::UnparseableResponse {
            url,
            reason: e.to_string(),
        })
    }
}

/// Flat-container manifest location for a package version
pub fn manifest_url(feed_url: &str, package_id: &str, version: &str) -> String {
    let base = match feed_url.strip_suffix("/index.json") {
        Some(root) => format!("{root}-flatcontainer"),
        None => feed_url.trim_end_matches('/').to_string(),
    };
    let id = package_id.to_lowercase();

    format!("{base}/{id}/{version}/{id}.nuspec")
}

/// Whether a `<dependency>` with these scope attributes matters at runtime.
///
/// `include` wins over `exclude` when both are present. Tokens are trimmed
/// and compared exactly, so `Runtime` is not an allowed scope.
pub fn scope_selected(include: Option<&str>, exclude: Option<&str>) -> bool {
    match (include, exclude) {
        (None, None) => true,
        (Some(include), _) => intersects_allowed(include),
        (None, Some(exclude)) => !intersects_allowed(exclude),
    }
}

fn intersects_allowed(tokens: &str) -> bool {
    tokens
        .split(',')
        .map(str::trim)
        .any(|token| ALLOWED_SCOPES.contains(&token))
}

/// Extract runtime dependency edges from a nuspec document.
///
/// Namespace prefixes are ignored. `<dependency>` elements count when they sit
/// directly under `<dependencies>` or inside one grouping element below it.
pub fn parse_manifest(xml: &str) -> Result<Vec<DependencyEdge>, ManifestError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut saw_root = false;
    let mut edges = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                saw_root = true;
                if is_dependency_element(&element, &open) {
                    collect_dependency(&element, &mut edges)?;
                }
                open.push(element.local_name().as_ref().to_vec());
            }
            Event::Empty(element) => {
                saw_root = true;
                if is_dependency_element(&element, &open) {
                    collect_dependency(&element, &mut edges)?;
                }
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(ManifestError::MissingRoot);
    }
    if let Some(element) = open.last() {
        return Err(ManifestError::Unclosed {
            element: String::from_utf8_lossy(element).into_owned(),
        });
    }

    Ok(edges)
}

fn is_dependency_element(element: &BytesStart<'_>, open: &[Vec<u8>]) -> bool {
    if element.local_name().as_ref() != b"dependency" {
        return false;
    }

    let mut ancestors = open.iter().rev();
    match (ancestors.next(), ancestors.next()) {
        (Some(parent), _) if parent == b"dependencies" => true,
        (Some(_), Some(grandparent)) => grandparent == b"dependencies",
        _ => false,
    }
}

fn collect_dependency(
    element: &BytesStart<'_>,
    edges: &mut Vec<DependencyEdge>,
) -> Result<(), ManifestError> {
    let mut id = None;
    let mut version = None;
    let mut include = None;
    let mut exclude = None;

    for attribute in element.attributes() {
        let attribute = attribute?;
        let raw = std::str::from_utf8(&attribute.value)?;
        let value = quick_xml::escape::unescape(raw)?.into_owned();

        match attribute.key.local_name().as_ref() {
            b"id" => id = Some(value),
            b"version" => version = Some(value),
            b"include" => include = Some(value),
            b"exclude" => exclude = Some(value),
            _ => {}
        }
    }

    if !scope_selected(include.as_deref(), exclude.as_deref()) {
        trace!(?id, ?include, ?exclude, "dependency filtered by scope");
        return Ok(());
    }

    match (id, version) {
        (Some(id), Some(version)) => edges.push(DependencyEdge::new(id, version)),
        (id, version) => debug!(?id, ?version, "dependency without id or version"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    include!("standard.test.rs");
}
