//! Transitive dependency discovery
//!
//! Starting from one package coordinate, [`DependencyDiscovery`] asks a
//! [`DependencySource`] for declared edges, expands each unseen edge at the
//! minimum version of its range, and keeps going until the frontier is empty.
//!
//! Edges are deduplicated by their literal `(package, range)` text, not by the
//! version they resolve to. Feeds where many distinct range strings alias the
//! same package can therefore generate a lot of work, which is what
//! [`DiscoveryLimits`] and [`CancellationFlag`] bound.

pub mod version_range;

pub use version_range::parse_minimum;

use std::collections::HashSet;
use std::collections::hash_set;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::vec;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::primitives::{DependencyEdge, PackageCoordinate};

/// Default cap on how many edges deep a traversal expands
pub const DEFAULT_MAX_DEPTH: usize = 32;
/// Default cap on distinct edges recorded in one traversal
pub const DEFAULT_MAX_NODES: usize = 5000;

/// Anything that can list the declared dependencies of a coordinate
pub trait DependencySource: Send + Sync {
    /// Declared edges of `coordinate`, in feed order.
    ///
    /// Lookup failures are the source's concern; an empty list ends the branch.
    fn dependencies(
        &self,
        coordinate: &PackageCoordinate,
    ) -> impl Future<Output = Vec<DependencyEdge>> + Send;
}

/// Discovery errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Dependency discovery was cancelled")]
    Cancelled,
}

/// Work bounds for one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryLimits {
    /// Edges at this depth are recorded but not expanded (root edges are depth 1)
    pub max_depth: usize,
    /// Recording stops once this many edges are known
    pub max_nodes: usize,
}

impl Default for DiscoveryLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

/// Shared stop signal, checked before every expansion step
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Every edge reachable from the root, in no particular order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    edges: HashSet<DependencyEdge>,
    truncated: bool,
}

impl DependencySet {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, edge: &DependencyEdge) -> bool {
        self.edges.contains(edge)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, DependencyEdge> {
        self.edges.iter()
    }

    /// True when a depth or node limit cut the traversal short
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Edges ordered by package name, then range text
    pub fn into_sorted_vec(self) -> Vec<DependencyEdge> {
        let mut edges: Vec<_> = self.edges.into_iter().collect();
        edges.sort();
        edges
    }
}

impl IntoIterator for DependencySet {
    type Item = DependencyEdge;
    type IntoIter = hash_set::IntoIter<DependencyEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

/// One expanded coordinate whose edges are still being walked
struct Frame {
    depth: usize,
    pending: vec::IntoIter<DependencyEdge>,
}

/// Depth-first dependency graph builder
pub struct DependencyDiscovery<S> {
    source: S,
    limits: DiscoveryLimits,
    cancellation: CancellationFlag,
}

impl<S: DependencySource> DependencyDiscovery<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            limits: DiscoveryLimits::default(),
            cancellation: CancellationFlag::new(),
        }
    }

    pub fn with_limits(mut self, limits: DiscoveryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Collect every dependency edge reachable from `root_name` at `root_version`.
    ///
    /// Edges are visited in the order a recursive walk would visit them: each
    /// edge is expanded fully before its next sibling is looked at. An edge
    /// whose range has no minimum bound is dropped without being recorded.
    pub async fn discover(
        &self,
        root_name: &str,
        root_version: &str,
    ) -> Result<DependencySet, DiscoveryError> {
        let root = PackageCoordinate::new(root_name, root_version);
        debug!(package = %root, limits = ?self.limits, "starting dependency discovery");

        self.check_cancelled()?;
        let mut visited: HashSet<DependencyEdge> = HashSet::new();
        let mut truncated = false;
        let mut frontier = vec![Frame {
            depth: 0,
            pending: self.source.dependencies(&root).await.into_iter(),
        }];

        while let Some(frame) = frontier.last_mut() {
            self.check_cancelled()?;

            let Some(edge) = frame.pending.next() else {
                frontier.pop();
                continue;
            };
            let depth = frame.depth + 1;

            if edge.is_empty() {
                trace!("skipping empty dependency entry");
                continue;
            }
            if visited.contains(&edge) {
                trace!(%edge, "already visited");
                continue;
            }
            let Some(minimum) = parse_minimum(&edge.version_range) else {
                debug!(%edge, "range has no minimum bound, dropping edge");
                continue;
            };

            if visited.len() >= self.limits.max_nodes {
                warn!(
                    max_nodes = self.limits.max_nodes,
                    "node limit reached, stopping discovery"
                );
                truncated = true;
                break;
            }

            let next = PackageCoordinate::new(edge.package_name.clone(), minimum);
            visited.insert(edge);

            if depth >= self.limits.max_depth {
                debug!(package = %next, depth, "depth limit reached, not expanding");
                truncated = true;
                continue;
            }

            trace!(package = %next, depth, "expanding");
            let children = self.source.dependencies(&next).await;
            frontier.push(Frame {
                depth,
                pending: children.into_iter(),
            });
        }

        if truncated {
            warn!(
                package = %root,
                max_depth = self.limits.max_depth,
                max_nodes = self.limits.max_nodes,
                "dependency discovery stopped at a limit, result is partial"
            );
        }
        info!(
            package = %root,
            dependencies = visited.len(),
            "dependency discovery finished"
        );

        Ok(DependencySet {
            edges: visited,
            truncated,
        })
    }

    fn check_cancelled(&self) -> Result<(), DiscoveryError> {
        if self.cancellation.is_cancelled() {
            debug!("cancellation requested");
            return Err(DiscoveryError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    include!("mod.test.rs");
}
