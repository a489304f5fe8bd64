//! Path and token helpers.
//!
//! These are the small string predicates the walker and the reports share:
//! extracting a display name from a path, splitting the comma-separated
//! exclusion option, and the substring exclusion test itself.
//!
//! # Example
//!
//! ```
//! use dupfinder::scanner::path_utils::{file_name, is_excluded, parse_exclusions};
//!
//! assert_eq!(file_name("/path/to/file.ext"), "file.ext");
//!
//! let tokens = parse_exclusions("node_modules,.cache");
//! assert!(is_excluded("/home/me/.cache/thumb.png", &tokens));
//! assert!(!is_excluded("/home/me/photo.png", &tokens));
//! ```

/// Return the last `/`-separated component of a path string.
///
/// A path ending in `/` yields an empty name.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Check whether `needle` is exactly equal to one of the items.
#[must_use]
pub fn contains_string<S: AsRef<str>>(items: &[S], needle: &str) -> bool {
    items.iter().any(|item| item.as_ref() == needle)
}

/// Split a comma-separated exclusion option into tokens.
///
/// Empty input yields no tokens. Blank tokens (from `a,,b` or a trailing
/// comma) are dropped, since an empty substring would match every path.
#[must_use]
pub fn parse_exclusions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check whether any exclusion token is a substring of `path`.
#[must_use]
pub fn is_excluded<S: AsRef<str>>(path: &str, tokens: &[S]) -> bool {
    tokens.iter().any(|token| path.contains(token.as_ref()))
}
