use super::*;

#[test]
fn test_default_directives_scope_level_to_feedscout() {
    let directives = default_directives(LogLevel::Debug);
    assert!(directives.starts_with("feedscout_lib=debug,feedscout=debug"));
    assert!(directives.contains("reqwest=warn"));
    assert!(directives.contains("hyper_util=warn"));
    assert!(directives.ends_with(",debug"));
}

#[test]
fn test_default_directives_parse_as_filter() {
    for verbosity in 0..=4 {
        let directives = default_directives(LogLevel::from_verbosity(verbosity));
        assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
    }
}

#[test]
fn test_logger_global_tracks_initialization() {
    // Other tests may have installed a subscriber already
    assert_eq!(Logger::is_initialized(), Logger::global().is_some());
}

#[test]
fn test_progress_span_macro_builds_span() {
    let span = crate::progress_span!("discover", package = "Newtonsoft.Json");
    // No subscriber in this test, so the span is disabled but still valid
    let _entered = span.enter();
}

#[test]
fn test_installed_config_is_retained() {
    if let Some(logger) = Logger::global() {
        assert!(logger.config().level <= LogLevel::Trace);
    }
}
