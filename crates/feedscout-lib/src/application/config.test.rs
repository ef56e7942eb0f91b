use super::*;

#[test]
fn test_config_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.log_level, 1);
    assert_eq!(config.net_timeout, 30);
    assert_eq!(config.limits(), DiscoveryLimits::default());
    assert!(config.feeds.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_limits_are_rejected() {
    let config = AppConfig {
        max_nodes: 0,
        ..AppConfig::default()
    };

    match config.validate() {
        Err(ConfigError::ValidationFailed { reason }) => assert!(reason.contains("max-nodes")),
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_log_level_is_rejected() {
    let config = AppConfig {
        log_level: 9,
        ..AppConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_logger_config_mapping() {
    let config = AppConfig {
        log_level: 3,
        log_format: LogFormat::Json,
        ..AppConfig::default()
    };

    let logger = config.to_logger_config(true);
    assert_eq!(logger.level, LogLevel::Debug);
    assert_eq!(logger.format, LogFormat::Json);
    assert_eq!(logger.output, LogOutput::Stderr);
    assert!(logger.ansi);
}

#[test]
fn test_networking_config_carries_timeout() {
    let config = AppConfig {
        net_timeout: 5,
        ..AppConfig::default()
    };
    assert_eq!(config.networking_config().timeout_seconds, 5);
}
