//! Minimum-bound extraction from NuGet version range expressions

use regex::Regex;
use std::sync::LazyLock;

/// An opening bracket followed by a dotted numeric version with an optional
/// hyphenated pre-release tag (`-beta`, `-rc.1`, `-preview.2.3`)
static LOWER_BOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\[(](\d+(?:\.\d+)*(?:-\w+(?:\.\d+)*)?)").expect("range pattern is valid")
});

/// Minimum version named by `range`, if it has one.
///
/// Bare versions (`1.2.3`) and ranges without a lower bound (`(, 2.0.0]`)
/// yield `None`; such edges cannot be expanded.
pub fn parse_minimum(range: &str) -> Option<String> {
    LOWER_BOUND
        .captures(range)
        .and_then(|captures| captures.get(1))
        .map(|version| version.as_str().to_string())
}

#[cfg(test)]
mod tests {
    include!("version_range.test.rs");
}
