//! Response body cleanup before structured parsing
//!
//! Some feeds wrap their payloads in zero-width or byte-order-mark characters,
//! which strict XML/JSON parsers reject.

/// Zero-width space, zero-width non-joiner, zero-width joiner, BOM
const MARKERS: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{FEFF}'];

/// Decode `raw` as UTF-8 and strip one wrapping marker from each end.
///
/// Invalid UTF-8 sequences become U+FFFD. A trailing marker directly
/// followed by a single final newline is stripped as well.
pub fn sanitize(raw: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(raw);
    let text: &str = &decoded;
    let body = text.strip_prefix(MARKERS).unwrap_or(text);

    if let Some(stripped) = body.strip_suffix(MARKERS) {
        return stripped.to_string();
    }

    match body
        .strip_suffix('\n')
        .and_then(|rest| rest.strip_suffix(MARKERS))
    {
        Some(stripped) => format!("{stripped}\n"),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    include!("sanitize.test.rs");
}
