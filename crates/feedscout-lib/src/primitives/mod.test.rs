use super::*;
use std::collections::HashSet;

#[test]
fn test_edges_compare_by_literal_range() {
    let a = DependencyEdge::new("Newtonsoft.Json", "[13.0.1, )");
    let b = DependencyEdge::new("Newtonsoft.Json", "[13.0.1]");

    assert_ne!(a, b);

    let mut set = HashSet::new();
    set.insert(a.clone());
    set.insert(b);
    set.insert(a);
    assert_eq!(set.len(), 2);
}

#[test]
fn test_edge_is_empty() {
    assert!(DependencyEdge::new("", "[1.0.0, )").is_empty());
    assert!(DependencyEdge::new("   ", "[1.0.0, )").is_empty());
    assert!(!DependencyEdge::new("System.Memory", "").is_empty());
}

#[test]
fn test_edge_serializes_with_feed_field_names() {
    let edge = DependencyEdge::new("System.Memory", "[4.5.5, )");
    let json = serde_json::to_value(&edge).unwrap();

    assert_eq!(json["packageName"], "System.Memory");
    assert_eq!(json["versionRange"], "[4.5.5, )");
}

#[test]
fn test_auth_header_debug_is_redacted() {
    let header = AuthHeader::authorization("Basic c2VjcmV0");
    let rendered = format!("{:?}", header);

    assert!(rendered.contains("Authorization"));
    assert!(!rendered.contains("c2VjcmV0"));
    assert_eq!(header.value(), "Basic c2VjcmV0");
}

#[test]
fn test_feed_descriptor_support() {
    assert!(FeedDescriptor::v3("https://api.nuget.org/v3/index.json").is_supported());

    let v2 = FeedDescriptor {
        repository_url: "https://www.nuget.org/api/v2".to_string(),
        auth_header: None,
        protocol_version: "v2".to_string(),
    };
    assert!(!v2.is_supported());
}

#[test]
fn test_log_level_from_verbosity() {
    assert_eq!(LogLevel::from_verbosity(0), LogLevel::Error);
    assert_eq!(LogLevel::from_verbosity(1), LogLevel::Warning);
    assert_eq!(LogLevel::from_verbosity(3), LogLevel::Debug);
    assert_eq!(LogLevel::from_verbosity(9), LogLevel::Trace);
    assert_eq!(LogLevel::Warning.as_filter(), "warn");
}
