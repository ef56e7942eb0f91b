use super::*;

#[test]
fn test_plain_body_is_unchanged() {
    assert_eq!(sanitize(b"{\"value\":[]}"), "{\"value\":[]}");
}

#[test]
fn test_strips_leading_bom() {
    let raw = "\u{FEFF}{\"value\":[]}".as_bytes();
    assert_eq!(sanitize(raw), "{\"value\":[]}");
}

#[test]
fn test_strips_trailing_zero_width_space() {
    let raw = "<package/>\u{200B}".as_bytes();
    assert_eq!(sanitize(raw), "<package/>");
}

#[test]
fn test_strips_trailing_marker_before_final_newline() {
    let raw = "<package/>\u{200D}\n".as_bytes();
    assert_eq!(sanitize(raw), "<package/>\n");
}

#[test]
fn test_strips_only_one_marker_per_end() {
    let raw = "\u{FEFF}\u{200B}x\u{200C}\u{200C}".as_bytes();
    assert_eq!(sanitize(raw), "\u{200B}x\u{200C}");
}

#[test]
fn test_inner_markers_are_kept() {
    let raw = "a\u{200B}b".as_bytes();
    assert_eq!(sanitize(raw), "a\u{200B}b");
}

#[test]
fn test_invalid_utf8_is_replaced() {
    let raw = [b'o', b'k', 0xFF];
    assert_eq!(sanitize(&raw), "ok\u{FFFD}");
}

#[test]
fn test_bom_stripping_enables_json_parse() {
    let raw = "\u{FEFF}{\"value\":[{\"name\":\"A\"}]}".as_bytes();

    let unsanitized = String::from_utf8(raw.to_vec()).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&unsanitized).is_err());

    let parsed: serde_json::Value = serde_json::from_str(&sanitize(raw)).unwrap();
    assert_eq!(parsed["value"][0]["name"], "A");
}
