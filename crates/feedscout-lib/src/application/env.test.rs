use super::*;

fn env(no_color: Option<&str>, force_color: Option<&str>, ci: Option<&str>) -> EnvironmentConfig {
    EnvironmentConfig {
        no_color: no_color.map(str::to_string),
        force_color: force_color.map(str::to_string),
        ci: ci.map(str::to_string),
    }
}

#[test]
fn test_colour_by_default() {
    assert!(EnvironmentConfig::default().use_ansi());
}

#[test]
fn test_no_color_disables() {
    assert!(!env(Some("1"), None, None).use_ansi());
}

#[test]
fn test_empty_no_color_is_ignored() {
    assert!(env(Some(""), None, None).use_ansi());
}

#[test]
fn test_ci_disables() {
    assert!(!env(None, None, Some("true")).use_ansi());
}

#[test]
fn test_force_color_wins() {
    assert!(env(Some("1"), Some("1"), Some("true")).use_ansi());
    assert!(!env(None, Some("false"), None).use_ansi());
}

#[test]
fn test_invalid_force_color_values_ignored() {
    assert!(env(None, Some("invalid"), None).use_ansi());
    assert!(!env(None, Some("invalid"), Some("1")).use_ansi());
}

#[test]
fn test_load_from_process_environment() {
    // Only asserts that loading succeeds; the values depend on the test runner
    assert!(EnvironmentConfig::load().is_ok());
}
