use super::*;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_discover_arguments() {
    let cli = Cli::try_parse_from([
        "feedscout",
        "discover",
        "Newtonsoft.Json",
        "13.0.3",
        "--format",
        "json",
        "--feed",
        "https://api.nuget.org/v3/index.json,https://mirror.example.com/v3/index.json",
        "--max-depth",
        "8",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Discover {
            package,
            version,
            format,
        }) => {
            assert_eq!(package, "Newtonsoft.Json");
            assert_eq!(version, "13.0.3");
            assert_eq!(format, OutputFormat::Json);
        }
        other => panic!("expected discover, got {other:?}"),
    }
    assert_eq!(cli.config.feeds.len(), 2);
    assert_eq!(cli.config.max_depth, 8);
}

#[test]
fn test_discover_requires_version() {
    assert!(Cli::try_parse_from(["feedscout", "discover", "Newtonsoft.Json"]).is_err());
}

#[test]
fn test_feeds_command_with_feeds_file() {
    let cli = Cli::try_parse_from(["feedscout", "--feeds-file", "feeds.toml", "feeds"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Feeds)));
    assert_eq!(
        cli.config.feeds_file.as_deref(),
        Some(std::path::Path::new("feeds.toml"))
    );
}

#[test]
fn test_log_format_aliases() {
    let cli = Cli::try_parse_from(["feedscout", "--log-format", "plain", "feeds"]).unwrap();
    assert_eq!(cli.config.log_format, crate::primitives::LogFormat::Text);
}

#[test]
fn test_version_flag_still_available_on_discover() {
    let error = Cli::try_parse_from(["feedscout", "discover", "--version"]).unwrap_err();
    assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
}

#[test]
fn test_discover_positional_version_is_not_the_version_flag() {
    let cli = Cli::try_parse_from(["feedscout", "discover", "Serilog", "3.1.1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Discover { version, .. }) if version == "3.1.1"
    ));
}
