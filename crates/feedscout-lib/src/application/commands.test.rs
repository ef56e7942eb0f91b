use super::*;
use crate::feeds::standard::manifest_url;
use crate::networking::MockHttpClient;
use crate::primitives::AuthHeader;

const NUGET_ORG: &str = "https://api.nuget.org/v3/index.json";

fn report(dependencies: Vec<DependencyEdge>) -> DiscoveryReport {
    DiscoveryReport {
        package: "Root".to_string(),
        version: "1.0.0".to_string(),
        truncated: false,
        dependencies,
    }
}

#[test]
fn test_text_report_lists_one_edge_per_line() {
    let listed = report(vec![
        DependencyEdge::new("A", "[1.0.0, )"),
        DependencyEdge::new("B", "[2.0.0]"),
    ]);
    assert_eq!(listed.to_text(), "A [1.0.0, )\nB [2.0.0]\n");
    assert_eq!(report(Vec::new()).to_text(), "");
}

#[test]
fn test_json_report_shape() {
    let json = report(vec![DependencyEdge::new("A", "[1.0.0, )")])
        .to_json()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["package"], "Root");
    assert_eq!(value["truncated"], false);
    assert_eq!(value["dependencies"][0]["packageName"], "A");
    assert_eq!(value["dependencies"][0]["versionRange"], "[1.0.0, )");
}

#[test]
fn test_feed_summary_rendering() {
    let supported = FeedSummary::from_descriptor(
        &FeedDescriptor::v3(NUGET_ORG).with_auth(AuthHeader::authorization("Bearer x")),
    );
    assert_eq!(
        supported.to_string(),
        format!("{NUGET_ORG}\tflat-container [auth]")
    );

    let legacy = FeedSummary::from_descriptor(&FeedDescriptor {
        repository_url: "https://legacy.example.com/api/v2".to_string(),
        auth_header: None,
        protocol_version: "v2".to_string(),
    });
    assert!(!legacy.supported);
    assert!(legacy.to_string().ends_with("skipped (protocol v2)"));
}

#[tokio::test]
async fn test_run_discovery_sorts_edges() {
    let http = Arc::new(
        MockHttpClient::new()
            .with_response(
                &manifest_url(NUGET_ORG, "Root", "1.0.0"),
                200,
                r#"<package><metadata><dependencies>
                    <dependency id="Zeta" version="[1.0.0, )" />
                    <dependency id="Alpha" version="[2.0.0, )" />
                </dependencies></metadata></package>"#,
            ),
    );

    let report = run_discovery(
        http,
        &[FeedDescriptor::v3(NUGET_ORG)],
        DiscoveryLimits::default(),
        CancellationFlag::new(),
        "Root",
        "1.0.0",
    )
    .await
    .unwrap();

    assert_eq!(
        report.dependencies,
        vec![
            DependencyEdge::new("Alpha", "[2.0.0, )"),
            DependencyEdge::new("Zeta", "[1.0.0, )"),
        ]
    );
    assert!(!report.truncated);
}

#[tokio::test]
async fn test_run_discovery_without_supported_feeds() {
    let v2 = FeedDescriptor {
        repository_url: "https://legacy.example.com/api/v2".to_string(),
        auth_header: None,
        protocol_version: "v2".to_string(),
    };

    let result = run_discovery(
        Arc::new(MockHttpClient::new()),
        &[v2],
        DiscoveryLimits::default(),
        CancellationFlag::new(),
        "Root",
        "1.0.0",
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_discovery_reports_cancellation() {
    let cancellation = CancellationFlag::new();
    cancellation.cancel();

    let result = run_discovery(
        Arc::new(MockHttpClient::new()),
        &[FeedDescriptor::v3(NUGET_ORG)],
        DiscoveryLimits::default(),
        cancellation,
        "Root",
        "1.0.0",
    )
    .await;

    let error = result.unwrap_err();
    assert!(error.to_string().contains("did not complete"));
    assert!(error.chain().any(|cause| cause.to_string().contains("cancelled")));
}
