// End-to-end discovery against a local HTTP server standing in for real feeds

use feedscout_lib::feeds::{HostedArtifactFeed, HostedFeedLocation, StandardFeed};
use feedscout_lib::networking::BackoffConfig;
use feedscout_lib::{
    AuthHeader, CancellationFlag, DependencyDiscovery, DependencyEdge, DiscoveryLimits,
    FeedDescriptor, FeedSet, NetworkingConfig, NetworkingManager, PackageCoordinate,
};
use mockito::{Matcher, Server};
use std::sync::Arc;
use std::time::Duration;

fn manager() -> Arc<NetworkingManager> {
    Arc::new(
        NetworkingManager::new(NetworkingConfig {
            timeout_seconds: 5,
            backoff: BackoffConfig {
                initial: Duration::from_millis(10),
                max: Duration::from_millis(20),
                multiplier: 2.0,
                max_retries: 2,
            },
        })
        .unwrap(),
    )
}

fn nuspec(deps: &[(&str, &str)]) -> String {
    let body: String = deps
        .iter()
        .map(|(id, range)| format!(r#"<dependency id="{id}" version="{range}" />"#))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <dependencies>
      <group targetFramework="net8.0">{body}</group>
    </dependencies>
  </metadata>
</package>"#
    )
}

#[tokio::test]
async fn test_standard_feed_sends_auth_and_parses_bom_prefixed_manifest() {
    let mut server = Server::new_async().await;
    let body = format!(
        "\u{feff}{}",
        nuspec(&[("Serilog", "[2.10.0, )"), ("System.Memory", "[4.5.5]")])
    );
    let mock = server
        .mock("GET", "/v3-flatcontainer/serilog.sinks.file/5.0.0/serilog.sinks.file.nuspec")
        .match_header("authorization", "Bearer feed-token")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let feed = StandardFeed::new(
        manager(),
        format!("{}/v3/index.json", server.url()),
        Some(AuthHeader::authorization("Bearer feed-token")),
    );
    let edges = feed
        .fetch(&PackageCoordinate::new("Serilog.Sinks.File", "5.0.0"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        edges,
        vec![
            DependencyEdge::new("Serilog", "[2.10.0, )"),
            DependencyEdge::new("System.Memory", "[4.5.5]"),
        ]
    );
}

#[tokio::test]
async fn test_standard_feed_missing_manifest_is_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let feed = StandardFeed::new(manager(), format!("{}/v3/index.json", server.url()), None);
    let edges = feed
        .fetch(&PackageCoordinate::new("Missing", "1.0.0"))
        .await
        .unwrap();

    assert!(edges.is_empty());
}

#[tokio::test]
async fn test_hosted_feed_two_step_lookup() {
    let mut server = Server::new_async().await;
    let versions_path =
        "/contoso/guid-project/_apis/Packaging/Feeds/guid-feed/Packages/guid-package/Versions";

    let packages = server
        .mock(
            "GET",
            Matcher::Regex(
                r"^/contoso/tools/_apis/packaging/Feeds/internal/packages(\?.*)?$".to_string(),
            ),
        )
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("protocolType".into(), "nuget".into()),
            Matcher::UrlEncoded("packageNameQuery".into(), "Contoso.Core".into()),
            Matcher::UrlEncoded("api-version".into(), "7.0".into()),
        ]))
        .match_header("authorization", "Basic abc")
        .with_status(200)
        .with_body(format!(
            r#"{{"count":2,"value":[
                {{"name":"Contoso.Core.Extensions","_links":{{"versions":{{"href":"{0}/wrong"}}}}}},
                {{"name":"Contoso.Core","_links":{{"versions":{{"href":"{0}{1}"}}}}}}
            ]}}"#,
            server.url(),
            versions_path
        ))
        .create_async()
        .await;

    let versions = server
        .mock("GET", versions_path)
        .match_header("authorization", "Basic abc")
        .with_status(200)
        .with_body(
            r#"{"count":2,"value":[
                {"version":"2.0.0","dependencies":[{"packageName":"Old","versionRange":"[1.0.0, )"}]},
                {"version":"2.1.0","dependencies":[
                    {"packageName":"Contoso.Abstractions","versionRange":"[2.1.0, )"},
                    {"packageName":"System.Text.Json","versionRange":"[8.0.4, )"}
                ]}
            ]}"#,
        )
        .create_async()
        .await;

    let location = HostedFeedLocation::parse(
        "https://pkgs.dev.azure.com/contoso/tools/_packaging/internal/nuget/v3/index.json",
    )
    .unwrap();
    let feed = HostedArtifactFeed::new(
        manager(),
        location,
        Some(AuthHeader::authorization("Basic abc")),
    )
    .with_api_base(server.url());

    let edges = feed
        .fetch(&PackageCoordinate::new("Contoso.Core", "2.1.0"))
        .await
        .unwrap();

    packages.assert_async().await;
    versions.assert_async().await;
    assert_eq!(
        edges,
        vec![
            DependencyEdge::new("Contoso.Abstractions", "[2.1.0, )"),
            DependencyEdge::new("System.Text.Json", "[8.0.4, )"),
        ]
    );
}

#[tokio::test]
async fn test_transitive_discovery_over_http() {
    let mut server = Server::new_async().await;
    let manifest =
        |id: &str, version: &str| format!("/v3-flatcontainer/{id}/{version}/{id}.nuspec");

    let root = server
        .mock("GET", manifest("app.core", "1.0.0").as_str())
        .with_status(200)
        .with_body(nuspec(&[
            ("Lib.A", "[1.2.0, 2.0.0)"),
            ("Lib.B", "[3.0.0-beta.1, )"),
            ("Lib.Unbounded", "(, 5.0.0]"),
        ]))
        .expect(1)
        .create_async()
        .await;
    let lib_a = server
        .mock("GET", manifest("lib.a", "1.2.0").as_str())
        .with_status(200)
        .with_body(nuspec(&[("Lib.Shared", "[1.0.0, )")]))
        .expect(1)
        .create_async()
        .await;
    let lib_b = server
        .mock("GET", manifest("lib.b", "3.0.0-beta.1").as_str())
        .with_status(200)
        .with_body(nuspec(&[("Lib.Shared", "[1.0.0, )"), ("Lib.A", "[1.2.0, 2.0.0)")]))
        .expect(1)
        .create_async()
        .await;
    let shared = server
        .mock("GET", manifest("lib.shared", "1.0.0").as_str())
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let feeds = FeedSet::from_descriptors(
        manager(),
        &[FeedDescriptor::v3(format!("{}/v3/index.json", server.url()))],
    );
    let result = DependencyDiscovery::new(feeds)
        .with_limits(DiscoveryLimits::default())
        .with_cancellation(CancellationFlag::new())
        .discover("App.Core", "1.0.0")
        .await
        .unwrap();

    root.assert_async().await;
    lib_a.assert_async().await;
    lib_b.assert_async().await;
    shared.assert_async().await;

    assert!(!result.is_truncated());
    assert_eq!(
        result.into_sorted_vec(),
        vec![
            DependencyEdge::new("Lib.A", "[1.2.0, 2.0.0)"),
            DependencyEdge::new("Lib.B", "[3.0.0-beta.1, )"),
            DependencyEdge::new("Lib.Shared", "[1.0.0, )"),
        ]
    );
}

#[tokio::test]
async fn test_rate_limited_branch_recovers_after_backoff() {
    let mut server = Server::new_async().await;
    let path = "/v3-flatcontainer/busy/1.0.0/busy.nuspec";

    let limited = server
        .mock("GET", path)
        .with_status(429)
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("GET", path)
        .with_status(200)
        .with_body(nuspec(&[("Calm", "[1.0.0, )")]))
        .expect(1)
        .create_async()
        .await;

    let feeds = FeedSet::from_descriptors(
        manager(),
        &[FeedDescriptor::v3(format!("{}/v3/index.json", server.url()))],
    );
    let result = DependencyDiscovery::new(feeds)
        .discover("Busy", "1.0.0")
        .await
        .unwrap();

    limited.assert_async().await;
    ok.assert_async().await;
    assert!(result.contains(&DependencyEdge::new("Calm", "[1.0.0, )")));
}
