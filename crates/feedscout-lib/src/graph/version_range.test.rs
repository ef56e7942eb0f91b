use super::*;

#[test]
fn test_inclusive_interval() {
    assert_eq!(parse_minimum("[1.2.3, 2.0.0)"), Some("1.2.3".to_string()));
}

#[test]
fn test_exact_and_open_lower_bounds() {
    assert_eq!(parse_minimum("[4.5.5]"), Some("4.5.5".to_string()));
    assert_eq!(parse_minimum("(1.0,)"), Some("1.0".to_string()));
    assert_eq!(parse_minimum("[8.0.0, )"), Some("8.0.0".to_string()));
}

#[test]
fn test_prerelease_suffix() {
    assert_eq!(
        parse_minimum("[2.0.0-beta.1,)"),
        Some("2.0.0-beta.1".to_string())
    );
    assert_eq!(
        parse_minimum("[9.0.0-preview.7.24405.7, )"),
        Some("9.0.0-preview.7.24405.7".to_string())
    );
    assert_eq!(parse_minimum("[1.0.0-rc, )"), Some("1.0.0-rc".to_string()));
}

#[test]
fn test_bare_version_has_no_bound() {
    assert_eq!(parse_minimum("1.2.3"), None);
}

#[test]
fn test_unbounded_or_malformed_ranges() {
    assert_eq!(parse_minimum("(, 2.0.0]"), None);
    assert_eq!(parse_minimum(""), None);
    assert_eq!(parse_minimum("[*]"), None);
    assert_eq!(parse_minimum("latest"), None);
}

#[test]
fn test_bound_found_after_leading_whitespace() {
    assert_eq!(parse_minimum(" [3.1.0, 4.0.0)"), Some("3.1.0".to_string()));
}
