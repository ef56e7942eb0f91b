// Tests for the two-step Azure Artifacts adapter

use super::*;
use crate::networking::MockHttpClient;

const FEED_URL: &str =
    "https://pkgs.dev.azure.com/dnceng/public/_packaging/dotnet-tools/nuget/v3/index.json";
const VERSIONS_URL: &str = "https://feeds.dev.azure.com/dnceng/9ee6d478/_apis/Packaging/Feeds/d1622942/Packages/c23152d1/Versions";

fn location() -> HostedFeedLocation {
    HostedFeedLocation::parse(FEED_URL).unwrap()
}

fn packages_body(name: &str) -> String {
    format!(
        r#"{{"count":2,"value":[
            {{"name":"{name}.Extra","_links":{{"versions":{{"href":"https://elsewhere/versions"}}}}}},
            {{"name":"{name}","_links":{{"versions":{{"href":"{VERSIONS_URL}"}}}}}}
        ]}}"#
    )
}

const VERSIONS_BODY: &str = r#"{"count":2,"value":[
    {"version":"1.0.0","dependencies":[{"packageName":"Old.Dep","versionRange":"[0.1.0, )"}]},
    {"version":"2.0.0","dependencies":[
        {"packageName":"System.Memory","versionRange":"[4.5.5, )","group":"net8.0"},
        {"packageName":"System.Buffers","versionRange":"[4.5.1, )","group":"net8.0"}
    ]}
]}"#;

#[test]
fn test_location_parse() {
    assert_eq!(
        location(),
        HostedFeedLocation {
            organization: "dnceng".to_string(),
            project: "public".to_string(),
            feed_id: "dotnet-tools".to_string(),
        }
    );
    assert!(HostedFeedLocation::parse("https://api.nuget.org/v3/index.json").is_none());
    assert!(
        HostedFeedLocation::parse("https://pkgs.dev.azure.com/org/_packaging/feed/nuget/v3/index.json")
            .is_none()
    );
}

#[test]
fn test_packages_query_url() {
    let http = Arc::new(MockHttpClient::new());
    let feed = HostedArtifactFeed::new(http, location(), None);

    assert_eq!(
        feed.packages_query_url("Microsoft.DotNet.Arcade"),
        "https://feeds.dev.azure.com/dnceng/public/_apis/packaging/Feeds/dotnet-tools/packages?protocolType=nuget&packageNameQuery=Microsoft.DotNet.Arcade&api-version=7.0"
    );
    assert!(feed.packages_query_url("a b&c").contains("packageNameQuery=a%20b%26c&"));
}

#[test]
fn test_api_base_override() {
    let http = Arc::new(MockHttpClient::new());
    let feed = HostedArtifactFeed::new(http, location(), None).with_api_base("http://127.0.0.1:9/");

    assert!(
        feed.packages_query_url("A")
            .starts_with("http://127.0.0.1:9/dnceng/public/_apis/packaging/Feeds/dotnet-tools/packages?")
    );
}

#[tokio::test]
async fn test_two_step_lookup_returns_matching_version_dependencies() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(&query_url, 200, packages_body("Contoso.Core"))
            .with_response(VERSIONS_URL, 200, VERSIONS_BODY),
    );
    let auth = AuthHeader::authorization("Basic Og==");
    let feed = HostedArtifactFeed::new(http.clone(), location(), Some(auth.clone()));

    let edges = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
        .await
        .unwrap();

    assert_eq!(
        edges,
        vec![
            DependencyEdge::new("System.Memory", "[4.5.5, )"),
            DependencyEdge::new("System.Buffers", "[4.5.1, )"),
        ]
    );
    assert_eq!(http.requested_urls(), vec![query_url.clone(), VERSIONS_URL.to_string()]);
    assert_eq!(http.last_auth_for(&query_url), Some(auth.clone()));
    assert_eq!(http.last_auth_for(VERSIONS_URL), Some(auth));
}

#[tokio::test]
async fn test_version_match_is_exact() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(&query_url, 200, packages_body("Contoso.Core"))
            .with_response(VERSIONS_URL, 200, VERSIONS_BODY),
    );
    let feed = HostedArtifactFeed::new(http, location(), None);

    let edges = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.0"))
        .await
        .unwrap();
    assert!(edges.is_empty());
}

#[tokio::test]
async fn test_no_exact_name_match_skips_second_call() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("contoso.core");

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(&query_url, 200, packages_body("Contoso.Core"))
            .with_response(VERSIONS_URL, 200, VERSIONS_BODY),
    );
    let feed = HostedArtifactFeed::new(http.clone(), location(), None);

    let edges = feed
        .fetch(&PackageCoordinate::new("contoso.core", "2.0.0"))
        .await
        .unwrap();

    assert!(edges.is_empty());
    assert_eq!(http.request_count(VERSIONS_URL), 0);
}

#[tokio::test]
async fn test_missing_versions_link_yields_nothing() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(MockHttpClient::new().with_response(
        &query_url,
        200,
        r#"{"value":[{"name":"Contoso.Core","_links":{}}]}"#,
    ));
    let feed = HostedArtifactFeed::new(http.clone(), location(), None);

    let edges = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
        .await
        .unwrap();

    assert!(edges.is_empty());
    assert_eq!(http.requested_urls().len(), 1);
}

#[tokio::test]
async fn test_non_success_on_either_step_yields_nothing() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let unauthorized = Arc::new(MockHttpClient::new().with_response(&query_url, 401, ""));
    let feed = HostedArtifactFeed::new(unauthorized, location(), None);
    assert!(
        feed.fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
            .await
            .unwrap()
            .is_empty()
    );

    let versions_gone = Arc::new(
        MockHttpClient::new()
            .with_response(&query_url, 200, packages_body("Contoso.Core"))
            .with_response(VERSIONS_URL, 503, ""),
    );
    let feed = HostedArtifactFeed::new(versions_gone, location(), None);
    assert!(
        feed.fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_bom_prefixed_listing_parses() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(&query_url, 200, format!("\u{FEFF}{}", packages_body("Contoso.Core")))
            .with_response(VERSIONS_URL, 200, format!("\u{FEFF}{}\u{200B}", VERSIONS_BODY)),
    );
    let feed = HostedArtifactFeed::new(http, location(), None);

    let edges = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "1.0.0"))
        .await
        .unwrap();
    assert_eq!(edges, vec![DependencyEdge::new("Old.Dep", "[0.1.0, )")]);
}

#[tokio::test]
async fn test_malformed_json_is_unparseable() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(MockHttpClient::new().with_response(&query_url, 200, "{\"value\": ["));
    let feed = HostedArtifactFeed::new(http, location(), None);

    let result = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
        .await;
    assert!(matches!(result, Err(FeedError::UnparseableResponse { .. })));
}

#[tokio::test]
async fn test_null_fields_in_versions_listing_are_skipped() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(&query_url, 200, packages_body("Contoso.Core"))
            .with_response(
                VERSIONS_URL,
                200,
                r#"{"value":[
                    {"version":"1.0.0","dependencies":null},
                    null,
                    {"version":null,"dependencies":[{"packageName":"Stray","versionRange":"[1.0.0, )"}]},
                    {"version":"2.0.0","dependencies":[
                        {"packageName":"Good","versionRange":"[1.0.0, )"},
                        null,
                        {"packageName":"NoRange","versionRange":null},
                        {"packageName":null,"versionRange":"[2.0.0, )"},
                        {"packageName":"AlsoGood","versionRange":"[3.0.0, )"}
                    ]}
                ]}"#,
            ),
    );
    let feed = HostedArtifactFeed::new(http, location(), None);

    let edges = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
        .await
        .unwrap();

    assert_eq!(
        edges,
        vec![
            DependencyEdge::new("Good", "[1.0.0, )"),
            DependencyEdge::new("AlsoGood", "[3.0.0, )"),
        ]
    );
}

#[tokio::test]
async fn test_null_dependencies_on_target_version_is_empty() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(&query_url, 200, packages_body("Contoso.Core"))
            .with_response(
                VERSIONS_URL,
                200,
                r#"{"value":[{"version":"2.0.0","dependencies":null}]}"#,
            ),
    );
    let feed = HostedArtifactFeed::new(http, location(), None);

    let result = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
        .await;
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn test_last_exact_name_match_with_link_wins() {
    let addressing = HostedArtifactFeed::new(Arc::new(MockHttpClient::new()), location(), None);
    let query_url = addressing.packages_query_url("Contoso.Core");
    let stale_url = "https://feeds.dev.azure.com/dnceng/9ee6d478/_apis/Packaging/Feeds/d1622942/Packages/stale/Versions";

    let http = Arc::new(
        MockHttpClient::new()
            .with_response(
                &query_url,
                200,
                format!(
                    r#"{{"value":[
                        {{"name":"Contoso.Core","_links":{{"versions":{{"href":"{stale_url}"}}}}}},
                        {{"name":"Contoso.Core","_links":{{"versions":{{"href":"{VERSIONS_URL}"}}}}}},
                        {{"name":"Contoso.Core","_links":null}},
                        null
                    ]}}"#
                ),
            )
            .with_response(VERSIONS_URL, 200, VERSIONS_BODY),
    );
    let feed = HostedArtifactFeed::new(http.clone(), location(), None);

    let edges = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.0.0"))
        .await
        .unwrap();

    assert_eq!(edges.len(), 2);
    assert_eq!(http.request_count(stale_url), 0);
    assert_eq!(http.request_count(VERSIONS_URL), 1);
}
