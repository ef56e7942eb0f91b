use super::*;
use std::collections::HashMap;

const SAMPLE: &str = r#"
[[feeds]]
url = "https://api.nuget.org/v3/index.json"

[[feeds]]
url = "https://legacy.example.com/api/v2"
protocol_version = "v2"

[[feeds]]
url = "https://pkgs.dev.azure.com/contoso/tools/_packaging/internal/nuget/v3/index.json"
authorization_env = "CONTOSO_FEED_AUTH"

[[feeds]]
url = "https://mirror.example.com/v3/index.json"
authorization = "Basic dXNlcjpwYXNz"
"#;

#[test]
fn test_parse_feeds_file() {
    let file = FeedsFile::parse(SAMPLE).unwrap();

    assert_eq!(file.feeds.len(), 4);
    assert_eq!(file.feeds[0].protocol_version, "v3");
    assert_eq!(file.feeds[1].protocol_version, "v2");
    assert_eq!(
        file.feeds[2].authorization_env.as_deref(),
        Some("CONTOSO_FEED_AUTH")
    );
}

#[test]
fn test_descriptors_resolve_credentials() {
    let env: HashMap<&str, &str> = [("CONTOSO_FEED_AUTH", "Bearer token")].into();
    let descriptors = FeedsFile::parse(SAMPLE)
        .unwrap()
        .into_descriptors_with(|var| env.get(var).map(|value| value.to_string()))
        .unwrap();

    assert_eq!(descriptors.len(), 4);
    assert_eq!(descriptors[0].auth_header, None);
    assert!(!descriptors[1].is_supported());
    assert_eq!(
        descriptors[2].auth_header,
        Some(AuthHeader::authorization("Bearer token"))
    );
    assert_eq!(
        descriptors[3].auth_header.as_ref().map(|h| h.value()),
        Some("Basic dXNlcjpwYXNz")
    );
}

#[test]
fn test_missing_credential_variable() {
    let result = FeedsFile::parse(SAMPLE)
        .unwrap()
        .into_descriptors_with(|_| None);

    match result {
        Err(FeedsFileError::MissingCredential { var, .. }) => assert_eq!(var, "CONTOSO_FEED_AUTH"),
        other => panic!("expected missing credential, got {other:?}"),
    }
}

#[test]
fn test_malformed_file() {
    assert!(matches!(
        FeedsFile::parse("[[feeds]]\nprotocol_version = 3"),
        Err(FeedsFileError::Parse { .. })
    ));
}

#[test]
fn test_empty_file_has_no_feeds() {
    assert!(FeedsFile::parse("").unwrap().feeds.is_empty());
}

#[test]
fn test_adhoc_feeds_follow_file_feeds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feeds.toml");
    std::fs::write(&path, "[[feeds]]\nurl = \"https://api.nuget.org/v3/index.json\"\n").unwrap();

    let config = AppConfig {
        feeds_file: Some(path),
        feeds: vec![" https://mirror.example.com/v3/index.json".to_string()],
        ..AppConfig::default()
    };

    let urls: Vec<String> = config
        .feed_descriptors()
        .unwrap()
        .into_iter()
        .map(|d| d.repository_url)
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://api.nuget.org/v3/index.json",
            "https://mirror.example.com/v3/index.json",
        ]
    );
}

#[test]
fn test_missing_feeds_file() {
    let config = AppConfig {
        feeds_file: Some(PathBuf::from("/nonexistent/feeds.toml")),
        ..AppConfig::default()
    };
    assert!(matches!(
        config.feed_descriptors(),
        Err(FeedsFileError::Read { .. })
    ));
}
