// Tests for the flat-container adapter

use super::*;
use crate::networking::MockHttpClient;

const FEED: &str = "https://api.nuget.org/v3/index.json";

const GROUPED_NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>Microsoft.Extensions.Logging</id>
    <version>8.0.0</version>
    <dependencies>
      <group targetFramework="net8.0">
        <dependency id="Microsoft.Extensions.DependencyInjection" version="8.0.0" exclude="Build,Analyzers" />
        <dependency id="Microsoft.Extensions.Options" version="[8.0.0, )" />
      </group>
      <group targetFramework=".NETStandard2.0">
        <dependency id="System.Memory" version="4.5.5" include="compile,runtime" />
        <dependency id="Microsoft.SourceLink.GitHub" version="[1.1.1, )" include="build" />
      </group>
    </dependencies>
  </metadata>
</package>"#;

#[test]
fn test_manifest_url_replaces_index_suffix() {
    assert_eq!(
        manifest_url(FEED, "Newtonsoft.Json", "13.0.1"),
        "https://api.nuget.org/v3-flatcontainer/newtonsoft.json/13.0.1/newtonsoft.json.nuspec"
    );
}

#[test]
fn test_manifest_url_keeps_version_text() {
    let url = manifest_url(
        "https://example.com/nuget/v3/index.json",
        "My.Package",
        "2.0.0-Beta.1",
    );
    assert_eq!(
        url,
        "https://example.com/nuget/v3-flatcontainer/my.package/2.0.0-Beta.1/my.package.nuspec"
    );
}

#[test]
fn test_scope_selection_rules() {
    assert!(scope_selected(None, None));
    assert!(scope_selected(Some("compile,runtime"), None));
    assert!(!scope_selected(Some("build"), None));
    assert!(!scope_selected(None, Some("all")));
    assert!(scope_selected(None, Some("build, analyzers")));
    assert!(scope_selected(Some(" runtime "), None));
}

#[test]
fn test_scope_tokens_are_case_sensitive() {
    assert!(!scope_selected(Some("Runtime"), None));
    assert!(scope_selected(None, Some("Runtime")));
    assert!(scope_selected(None, Some("ALL, Compile")));
}

#[test]
fn test_include_wins_over_exclude() {
    assert!(scope_selected(Some("runtime"), Some("all")));
    assert!(!scope_selected(Some("contentfiles"), Some("build")));
}

#[test]
fn test_parse_grouped_manifest() {
    let edges = parse_manifest(GROUPED_NUSPEC).unwrap();

    assert_eq!(
        edges,
        vec![
            DependencyEdge::new("Microsoft.Extensions.DependencyInjection", "8.0.0"),
            DependencyEdge::new("Microsoft.Extensions.Options", "[8.0.0, )"),
            DependencyEdge::new("System.Memory", "4.5.5"),
        ]
    );
}

#[test]
fn test_parse_ungrouped_manifest() {
    let xml = r#"<package><metadata><dependencies>
        <dependency id="A" version="[1.0.0, )"></dependency>
        <dependency id="B" version="[2.0.0]" />
    </dependencies></metadata></package>"#;

    let edges = parse_manifest(xml).unwrap();
    assert_eq!(
        edges,
        vec![
            DependencyEdge::new("A", "[1.0.0, )"),
            DependencyEdge::new("B", "[2.0.0]"),
        ]
    );
}

#[test]
fn test_parse_ignores_namespace_prefixes() {
    let xml = r#"<ns:package xmlns:ns="urn:nuspec"><ns:metadata><ns:dependencies>
        <ns:group><ns:dependency ns:id="A" ns:version="[1.0.0, )" /></ns:group>
    </ns:dependencies></ns:metadata></ns:package>"#;

    let edges = parse_manifest(xml).unwrap();
    assert_eq!(edges, vec![DependencyEdge::new("A", "[1.0.0, )")]);
}

#[test]
fn test_parse_ignores_dependency_elements_elsewhere() {
    let xml = r#"<package><metadata>
        <dependency id="Stray" version="[1.0.0, )" />
        <frameworkAssemblies><dependency id="Nope" version="[1.0.0, )" /></frameworkAssemblies>
        <dependencies />
    </metadata></package>"#;

    assert!(parse_manifest(xml).unwrap().is_empty());
}

#[test]
fn test_parse_skips_incomplete_dependency() {
    let xml = r#"<package><metadata><dependencies>
        <dependency id="NoVersion" />
        <dependency version="[1.0.0, )" />
        <dependency id="Ok" version="[1.0.0, )" />
    </dependencies></metadata></package>"#;

    let edges = parse_manifest(xml).unwrap();
    assert_eq!(edges, vec![DependencyEdge::new("Ok", "[1.0.0, )")]);
}

#[test]
fn test_parse_unescapes_attributes() {
    let xml = r#"<package><metadata><dependencies>
        <dependency id="A&amp;B" version="[1.0.0, )" />
    </dependencies></metadata></package>"#;

    let edges = parse_manifest(xml).unwrap();
    assert_eq!(edges[0].package_name, "A&B");
}

#[test]
fn test_parse_rejects_malformed_documents() {
    assert!(matches!(
        parse_manifest("<package><metadata></package>"),
        Err(ManifestError::Xml(_))
    ));
    assert!(matches!(
        parse_manifest("<package><metadata>"),
        Err(ManifestError::Unclosed { .. })
    ));
    assert!(matches!(
        parse_manifest("not a manifest"),
        Err(ManifestError::MissingRoot)
    ));
}

#[tokio::test]
async fn test_fetch_returns_edges_from_sanitized_body() {
    let url = manifest_url(FEED, "Microsoft.Extensions.Logging", "8.0.0");
    let body = format!("\u{FEFF}{}", GROUPED_NUSPEC);
    let http = Arc::new(MockHttpClient::new().with_response(&url, 200, body));

    let feed = StandardFeed::new(http.clone(), FEED, None);
    let edges = feed
        .fetch(&PackageCoordinate::new("Microsoft.Extensions.Logging", "8.0.0"))
        .await
        .unwrap();

    assert_eq!(edges.len(), 3);
    assert_eq!(http.request_count(&url), 1);
}

#[tokio::test]
async fn test_fetch_non_success_yields_nothing() {
    let url = manifest_url(FEED, "Missing", "1.0.0");
    let http = Arc::new(MockHttpClient::new().with_response(&url, 500, "boom"));

    let feed = StandardFeed::new(http, FEED, None);
    let edges = feed
        .fetch(&PackageCoordinate::new("Missing", "1.0.0"))
        .await
        .unwrap();

    assert!(edges.is_empty());
}

#[tokio::test]
async fn test_fetch_sends_auth_header() {
    let url = manifest_url(FEED, "Private", "1.0.0");
    let http = Arc::new(MockHttpClient::new().with_response(&url, 404, ""));
    let auth = AuthHeader::authorization("Basic dXNlcjpwYXNz");

    let feed = StandardFeed::new(http.clone(), FEED, Some(auth.clone()));
    feed.fetch(&PackageCoordinate::new("Private", "1.0.0"))
        .await
        .unwrap();

    assert_eq!(http.last_auth_for(&url), Some(auth));
}

#[tokio::test]
async fn test_fetch_malformed_body_is_unparseable() {
    let url = manifest_url(FEED, "Broken", "1.0.0");
    let http = Arc::new(MockHttpClient::new().with_response(&url, 200, "<package><metadata>"));

    let feed = StandardFeed::new(http, FEED, None);
    let result = feed.fetch(&PackageCoordinate::new("Broken", "1.0.0")).await;

    assert!(matches!(result, Err(FeedError::UnparseableResponse { .. })));
}

#[tokio::test]
async fn test_fetch_transport_failure() {
    let url = manifest_url(FEED, "Offline", "1.0.0");
    let http = Arc::new(MockHttpClient::new().with_transport_error(&url, "connection refused"));

    let feed = StandardFeed::new(http, FEED, None);
    let result = feed.fetch(&PackageCoordinate::new("Offline", "1.0.0")).await;

    assert!(matches!(result, Err(FeedError::Transport { .. })));
}
