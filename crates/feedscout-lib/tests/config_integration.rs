use clap::Parser;
use feedscout_lib::application::{FeedsFileError, OutputFormat};
use feedscout_lib::feeds::FeedKind;
use feedscout_lib::{AppConfig, Cli, Commands};
use std::io::Write;

#[test]
fn test_config_default_creation() {
    let config = AppConfig::default();

    assert!(config.log_level <= 4);
    assert!(config.net_timeout > 0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_feeds_file_and_adhoc_feeds_from_cli() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[[feeds]]
url = "https://pkgs.dev.azure.com/contoso/tools/_packaging/internal/nuget/v3/index.json"
authorization = "Basic c2VjcmV0"

[[feeds]]
url = "https://legacy.example.com/api/v2"
protocol_version = "v2"
"#
    )
    .unwrap();

    let path = file.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from([
        "feedscout",
        "--feeds-file",
        path.as_str(),
        "--feed",
        "https://api.nuget.org/v3/index.json",
        "discover",
        "Contoso.Core",
        "2.1.0",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Some(Commands::Discover {
            format: OutputFormat::Text,
            ..
        })
    ));

    let descriptors = cli.config.feed_descriptors().unwrap();
    let kinds: Vec<(FeedKind, bool)> = descriptors
        .iter()
        .map(|d| (FeedKind::detect(&d.repository_url), d.is_supported()))
        .collect();

    assert_eq!(
        kinds,
        vec![
            (FeedKind::AzureArtifacts, true),
            (FeedKind::FlatContainer, false),
            (FeedKind::FlatContainer, true),
        ]
    );
    assert!(descriptors[0].auth_header.is_some());
    assert!(!format!("{:?}", descriptors[0]).contains("c2VjcmV0"));
}

#[test]
fn test_invalid_feeds_file_surfaces_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[feeds]]\nurl = ").unwrap();

    let config = AppConfig {
        feeds_file: Some(file.path().to_path_buf()),
        ..AppConfig::default()
    };

    assert!(matches!(
        config.feed_descriptors(),
        Err(FeedsFileError::Parse { .. })
    ));
}
