// Tests for dependency graph discovery

use super::*;
use crate::feeds::{FeedSet, HostedArtifactFeed, HostedFeedLocation};
use crate::networking::MockHttpClient;
use crate::primitives::FeedDescriptor;
use std::collections::HashMap;
use std::sync::Mutex;

// ============================================================================
// Test Utilities
// ============================================================================

/// In-memory feed keyed by exact coordinate, recording every lookup
#[derive(Default)]
struct StaticSource {
    packages: HashMap<PackageCoordinate, Vec<DependencyEdge>>,
    lookups: Mutex<Vec<PackageCoordinate>>,
}

impl StaticSource {
    fn with(mut self, name: &str, version: &str, deps: &[(&str, &str)]) -> Self {
        self.packages.insert(
            PackageCoordinate::new(name, version),
            deps.iter()
                .map(|(dep, range)| DependencyEdge::new(*dep, *range))
                .collect(),
        );
        self
    }

    fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn lookup_count(&self, name: &str, version: &str) -> usize {
        let target = PackageCoordinate::new(name, version);
        self.lookups
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == target)
            .count()
    }
}

impl DependencySource for StaticSource {
    async fn dependencies(&self, coordinate: &PackageCoordinate) -> Vec<DependencyEdge> {
        self.lookups.lock().unwrap().push(coordinate.clone());
        self.packages.get(coordinate).cloned().unwrap_or_default()
    }
}

/// Two packages that name each other through ever-longer range strings, so the
/// literal-text visited set alone never closes the loop
struct AliasingCycle {
    cancel_after: Option<(usize, CancellationFlag)>,
    lookups: Mutex<usize>,
}

impl AliasingCycle {
    fn new() -> Self {
        Self {
            cancel_after: None,
            lookups: Mutex::new(0),
        }
    }
}

impl DependencySource for AliasingCycle {
    async fn dependencies(&self, coordinate: &PackageCoordinate) -> Vec<DependencyEdge> {
        let mut lookups = self.lookups.lock().unwrap();
        *lookups += 1;
        if let Some((limit, flag)) = &self.cancel_after {
            if *lookups >= *limit {
                flag.cancel();
            }
        }

        let other = if coordinate.name == "A" { "B" } else { "A" };
        vec![DependencyEdge::new(
            other,
            format!("[{}.0, )", coordinate.version),
        )]
    }
}

fn edge(name: &str, range: &str) -> DependencyEdge {
    DependencyEdge::new(name, range)
}

// ============================================================================
// Traversal
// ============================================================================

#[tokio::test]
async fn test_root_without_dependencies_yields_empty_set() {
    let discovery = DependencyDiscovery::new(StaticSource::default());

    let result = discovery.discover("Leaf", "1.0.0").await.unwrap();

    assert!(result.is_empty());
    assert!(!result.is_truncated());
}

#[tokio::test]
async fn test_transitive_dependencies_expand_at_minimum_version() {
    let source = StaticSource::default()
        .with("Root", "1.0.0", &[("A", "[1.2.0, 2.0.0)")])
        .with("A", "1.2.0", &[("B", "[3.0.0-beta.1, )")])
        .with("B", "3.0.0-beta.1", &[]);
    let discovery = DependencyDiscovery::new(source);

    let result = discovery.discover("Root", "1.0.0").await.unwrap();

    assert_eq!(
        result.into_sorted_vec(),
        vec![edge("A", "[1.2.0, 2.0.0)"), edge("B", "[3.0.0-beta.1, )")]
    );
}

#[tokio::test]
async fn test_depth_first_visit_order() {
    let source = StaticSource::default()
        .with("Root", "1.0.0", &[("A", "[1.0.0, )"), ("B", "[1.0.0, )")])
        .with("A", "1.0.0", &[("C", "[1.0.0, )")]);
    let discovery = DependencyDiscovery::new(source);

    discovery.discover("Root", "1.0.0").await.unwrap();

    assert_eq!(
        discovery.source.lookups(),
        vec!["Root 1.0.0", "A 1.0.0", "C 1.0.0", "B 1.0.0"]
    );
}

#[tokio::test]
async fn test_identical_edge_is_recorded_and_expanded_once() {
    let source = StaticSource::default()
        .with("Root", "1.0.0", &[("A", "[1.0.0, )"), ("B", "[1.0.0, )")])
        .with("B", "1.0.0", &[("A", "[1.0.0, )")])
        .with("A", "1.0.0", &[("Shared", "[2.0.0, )")]);
    let discovery = DependencyDiscovery::new(source);

    let result = discovery.discover("Root", "1.0.0").await.unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(discovery.source.lookup_count("A", "1.0.0"), 1);
    assert_eq!(discovery.source.lookup_count("Shared", "2.0.0"), 1);
}

#[tokio::test]
async fn test_distinct_range_text_is_a_distinct_edge() {
    let source = StaticSource::default().with(
        "Root",
        "1.0.0",
        &[("A", "[1.0.0, )"), ("A", "[1.0.0]"), ("A", "[1.0.0, )")],
    );
    let discovery = DependencyDiscovery::new(source);

    let result = discovery.discover("Root", "1.0.0").await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.contains(&edge("A", "[1.0.0]")));
    assert_eq!(discovery.source.lookup_count("A", "1.0.0"), 2);
}

#[tokio::test]
async fn test_unparseable_range_is_dropped_but_siblings_continue() {
    let source = StaticSource::default().with(
        "Root",
        "1.0.0",
        &[("Bare", "1.0.0"), ("Open", "(, 2.0.0]"), ("Good", "[1.0.0, )")],
    );
    let discovery = DependencyDiscovery::new(source);

    let result = discovery.discover("Root", "1.0.0").await.unwrap();

    assert_eq!(result.into_sorted_vec(), vec![edge("Good", "[1.0.0, )")]);
    assert_eq!(discovery.source.lookup_count("Bare", "1.0.0"), 0);
}

#[tokio::test]
async fn test_empty_entries_are_skipped() {
    let source =
        StaticSource::default().with("Root", "1.0.0", &[("", "[1.0.0, )"), ("A", "[1.0.0, )")]);
    let discovery = DependencyDiscovery::new(source);

    let result = discovery.discover("Root", "1.0.0").await.unwrap();

    assert_eq!(result.into_sorted_vec(), vec![edge("A", "[1.0.0, )")]);
}

#[tokio::test]
async fn test_direct_cycle_terminates() {
    let source = StaticSource::default()
        .with("A", "1.0.0", &[("B", "[1.0.0, )")])
        .with("B", "1.0.0", &[("A", "[1.0.0]")]);
    let discovery = DependencyDiscovery::new(source);

    let result = discovery.discover("A", "1.0.0").await.unwrap();

    assert_eq!(
        result.into_sorted_vec(),
        vec![edge("A", "[1.0.0]"), edge("B", "[1.0.0, )")]
    );
}

// ============================================================================
// Guards
// ============================================================================

#[tokio::test]
async fn test_aliasing_cycle_stops_at_depth_limit() {
    let discovery = DependencyDiscovery::new(AliasingCycle::new()).with_limits(DiscoveryLimits {
        max_depth: 10,
        max_nodes: 1000,
    });

    let result = discovery.discover("A", "1").await.unwrap();

    assert!(result.is_truncated());
    assert_eq!(result.len(), 10);
    assert!(result.contains(&edge("B", "[1.0, )")));
}

#[tokio::test]
async fn test_aliasing_cycle_stops_at_node_limit() {
    let discovery = DependencyDiscovery::new(AliasingCycle::new()).with_limits(DiscoveryLimits {
        max_depth: usize::MAX,
        max_nodes: 25,
    });

    let result = discovery.discover("A", "1").await.unwrap();

    assert!(result.is_truncated());
    assert_eq!(result.len(), 25);
}

#[tokio::test]
async fn test_cancelled_before_start() {
    let flag = CancellationFlag::new();
    flag.cancel();
    let discovery = DependencyDiscovery::new(StaticSource::default()).with_cancellation(flag);

    let result = discovery.discover("Root", "1.0.0").await;

    assert_eq!(result, Err(DiscoveryError::Cancelled));
    assert!(discovery.source.lookups().is_empty());
}

#[tokio::test]
async fn test_cancelled_mid_traversal() {
    let flag = CancellationFlag::new();
    let source = AliasingCycle {
        cancel_after: Some((5, flag.clone())),
        lookups: Mutex::new(0),
    };
    let discovery = DependencyDiscovery::new(source).with_cancellation(flag);

    let result = discovery.discover("A", "1").await;

    assert_eq!(result, Err(DiscoveryError::Cancelled));
    assert_eq!(*discovery.source.lookups.lock().unwrap(), 5);
}

// ============================================================================
// Feed-backed discovery
// ============================================================================

#[tokio::test]
async fn test_hosted_two_step_lookup_through_discovery() {
    let feed_url =
        "https://pkgs.dev.azure.com/contoso/tools/_packaging/internal/nuget/v3/index.json";
    let versions_url = "https://feeds.dev.azure.com/contoso/guid-project/_apis/Packaging/Feeds/guid-feed/Packages/guid-package/Versions";

    let location = HostedFeedLocation::parse(feed_url).unwrap();
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location, None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(
                &query_url,
                200,
                format!(
                    r#"{{"value":[{{"name":"Contoso.Core","_links":{{"versions":{{"href":"{versions_url}"}}}}}}]}}"#
                ),
            )
            .with_response(
                versions_url,
                200,
                r#"{"value":[{"version":"2.1.0","dependencies":[
                    {"packageName":"Contoso.Abstractions","versionRange":"[2.1.0, )"},
                    {"packageName":"System.Text.Json","versionRange":"[8.0.4, )"}
                ]}]}"#,
            ),
    );

    let feeds = FeedSet::from_descriptors(http, &[FeedDescriptor::v3(feed_url)]);
    let discovery = DependencyDiscovery::new(feeds);

    let result = discovery.discover("Contoso.Core", "2.1.0").await.unwrap();

    assert_eq!(
        result.into_sorted_vec(),
        vec![
            edge("Contoso.Abstractions", "[2.1.0, )"),
            edge("System.Text.Json", "[8.0.4, )"),
        ]
    );
}

#[tokio::test]
async fn test_failed_branch_does_not_affect_siblings() {
    let feed_url = "https://api.nuget.org/v3/index.json";
    let manifest =
        |id: &str, version: &str| crate::feeds::standard::manifest_url(feed_url, id, version);

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(
                &manifest("Root", "1.0.0"),
                200,
                r#"<package><metadata><dependencies>
                    <dependency id="Broken" version="[1.0.0, )" />
                    <dependency id="Healthy" version="[1.0.0, )" />
                </dependencies></metadata></package>"#,
            )
            .with_response(&manifest("Broken", "1.0.0"), 500, "")
            .with_response(
                &manifest("Healthy", "1.0.0"),
                200,
                r#"<package><metadata><dependencies>
                    <dependency id="Leaf" version="[0.9.0, )" />
                </dependencies></metadata></package>"#,
            ),
    );

    let feeds = FeedSet::from_descriptors(http, &[FeedDescriptor::v3(feed_url)]);
    let result = DependencyDiscovery::new(feeds)
        .discover("Root", "1.0.0")
        .await
        .unwrap();

    assert_eq!(
        result.into_sorted_vec(),
        vec![
            edge("Broken", "[1.0.0, )"),
            edge("Healthy", "[1.0.0, )"),
            edge("Leaf", "[0.9.0, )"),
        ]
    );
}
