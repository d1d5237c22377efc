//! # Token Paths
//!
//! Dot-delimited addresses into a token document. A leaf has two paths: its
//! *node path* (`color.brand`) and its *value path* (`color.brand.value`).
//! Diagnostics and emitted names always use the value path.

use std::fmt;

use serde::Serialize;

/// Key under which a leaf stores its value.
pub const VALUE_KEY: &str = "value";

/// A dot-delimited token path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TokenPath(String);

impl TokenPath {
    /// Wrap a dotted string. No validation is applied; a path that names
    /// nothing simply fails to resolve.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Path of a top-level category.
    pub fn root(key: &str) -> Self {
        Self(key.to_string())
    }

    /// Append one key segment.
    pub fn child(&self, key: &str) -> Self {
        Self(format!("{}.{key}", self.0))
    }

    /// For a leaf's node path, the path of its `value` entry.
    pub fn value_path(&self) -> Self {
        self.child(VALUE_KEY)
    }

    /// The path with a trailing `.value` removed, if it has one.
    pub fn strip_value_suffix(&self) -> Option<Self> {
        self.0
            .strip_suffix(".value")
            .filter(|rest| !rest.is_empty())
            .map(|rest| Self(rest.to_string()))
    }

    /// Top-level category this path lives under.
    pub fn category(&self) -> &str {
        self.segments().next().unwrap_or("")
    }

    /// Key segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// True if `prefix` equals this path or is an ancestor of it on whole
    /// segment boundaries (`color` is a prefix of `color.brand`, not of
    /// `colors.brand`).
    pub fn starts_with_segments(&self, prefix: &str) -> bool {
        match self.0.strip_prefix(prefix) {
            Some("") => true,
            Some(rest) => rest.starts_with('.'),
            None => false,
        }
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TokenPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_and_value_path() {
        let p = TokenPath::root("color").child("brand");
        assert_eq!(p.as_str(), "color.brand");
        assert_eq!(p.value_path().as_str(), "color.brand.value");
        assert_eq!(p.category(), "color");
    }

    #[test]
    fn strip_value_suffix_only_strips_whole_segment() {
        assert_eq!(
            TokenPath::new("a.b.value").strip_value_suffix(),
            Some(TokenPath::new("a.b"))
        );
        assert_eq!(TokenPath::new("a.bvalue").strip_value_suffix(), None);
        assert_eq!(TokenPath::new("value").strip_value_suffix(), None);
    }

    #[test]
    fn segment_prefix_matching() {
        let p = TokenPath::new("color.brand.primary");
        assert!(p.starts_with_segments("color"));
        assert!(p.starts_with_segments("color.brand"));
        assert!(p.starts_with_segments("color.brand.primary"));
        assert!(!p.starts_with_segments("col"));
        assert!(!TokenPath::new("colors.brand").starts_with_segments("color"));
    }
}
