// Tests for adapter selection and per-feed failure isolation

use super::*;
use crate::networking::MockHttpClient;
use crate::primitives::AuthHeader;

const NUGET_ORG: &str = "https://api.nuget.org/v3/index.json";
const MIRROR: &str = "https://mirror.example.com/v3/index.json";
const AZURE: &str =
    "https://pkgs.dev.azure.com/contoso/tools/_packaging/internal/nuget/v3/index.json";

fn nuspec(deps: &[(&str, &str)]) -> String {
    let body: String = deps
        .iter()
        .map(|(id, range)| format!(r#"<dependency id="{id}" version="{range}" />"#))
        .collect();
    format!("<package><metadata><dependencies>{body}</dependencies></metadata></package>")
}

#[test]
fn test_feed_kind_detection() {
    assert_eq!(FeedKind::detect(NUGET_ORG), FeedKind::FlatContainer);
    assert_eq!(FeedKind::detect(AZURE), FeedKind::AzureArtifacts);
    assert_eq!(FeedKind::AzureArtifacts.to_string(), "azure-artifacts");
}

#[test]
fn test_adapter_selected_from_url_shape() {
    let http = Arc::new(MockHttpClient::new());

    let standard = FeedAdapter::for_descriptor(http.clone(), &FeedDescriptor::v3(NUGET_ORG));
    assert_eq!(standard.kind(), FeedKind::FlatContainer);

    let hosted = FeedAdapter::for_descriptor(http, &FeedDescriptor::v3(AZURE));
    match hosted {
        FeedAdapter::Hosted(feed) => assert_eq!(feed.location().organization, "contoso"),
        FeedAdapter::Standard(_) => panic!("expected hosted adapter"),
    }
}

#[test]
fn test_unsupported_descriptors_are_skipped() {
    let http = Arc::new(MockHttpClient::new());
    let v2 = FeedDescriptor {
        repository_url: "https://www.nuget.org/api/v2".to_string(),
        auth_header: None,
        protocol_version: "v2".to_string(),
    };

    let set = FeedSet::from_descriptors(http, &[v2, FeedDescriptor::v3(NUGET_ORG)]);
    assert_eq!(set.len(), 1);
    assert!(!set.is_empty());
}

#[tokio::test]
async fn test_fetch_all_concatenates_in_feed_order() {
    let coordinate = PackageCoordinate::new("Root", "1.0.0");
    let http = Arc::new(
        MockHttpClient::new()
            .with_response(
                &standard::manifest_url(NUGET_ORG, "Root", "1.0.0"),
                200,
                nuspec(&[("A", "[1.0.0, )")]),
            )
            .with_response(
                &standard::manifest_url(MIRROR, "Root", "1.0.0"),
                200,
                nuspec(&[("B", "[2.0.0, )"), ("A", "[1.0.0, )")]),
            ),
    );

    let set = FeedSet::from_descriptors(
        http,
        &[FeedDescriptor::v3(NUGET_ORG), FeedDescriptor::v3(MIRROR)],
    );
    let edges = set.fetch_all(&coordinate).await;

    assert_eq!(
        edges,
        vec![
            DependencyEdge::new("A", "[1.0.0, )"),
            DependencyEdge::new("B", "[2.0.0, )"),
            DependencyEdge::new("A", "[1.0.0, )"),
        ]
    );
}

#[tokio::test]
async fn test_failing_feed_does_not_affect_siblings() {
    let coordinate = PackageCoordinate::new("Root", "1.0.0");
    let healthy = "https://healthy.example.com/v3/index.json";
    let http = Arc::new(
        MockHttpClient::new()
            .with_transport_error(
                &standard::manifest_url(NUGET_ORG, "Root", "1.0.0"),
                "connection reset",
            )
            .with_response(
                &standard::manifest_url(MIRROR, "Root", "1.0.0"),
                200,
                "<package><metadata>",
            )
            .with_response(
                &standard::manifest_url(healthy, "Root", "1.0.0"),
                200,
                nuspec(&[("C", "[3.0.0, )")]),
            ),
    );

    let set = FeedSet::from_descriptors(
        http,
        &[
            FeedDescriptor::v3(NUGET_ORG),
            FeedDescriptor::v3(MIRROR),
            FeedDescriptor::v3(healthy),
        ],
    );

    let edges = set.dependencies(&coordinate).await;
    assert_eq!(edges, vec![DependencyEdge::new("C", "[3.0.0, )")]);
}

#[tokio::test]
async fn test_descriptor_auth_reaches_requests() {
    let coordinate = PackageCoordinate::new("Root", "1.0.0");
    let url = standard::manifest_url(NUGET_ORG, "Root", "1.0.0");
    let http = Arc::new(MockHttpClient::new());
    let auth = AuthHeader::authorization("Bearer abc");

    let set = FeedSet::from_descriptors(
        http.clone(),
        &[FeedDescriptor::v3(NUGET_ORG).with_auth(auth.clone())],
    );
    assert!(set.fetch_all(&coordinate).await.is_empty());
    assert_eq!(http.last_auth_for(&url), Some(auth));
}
