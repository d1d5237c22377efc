//! # CSS Variable Naming
//!
//! Maps a token's value path to its custom-property name:
//!
//! - segments are joined with `-`,
//! - camelCase boundaries and underscores become hyphens,
//! - everything is lower-cased and repeated hyphens collapse,
//! - the result is prefixed with `--` and, when configured, a namespace.
//!
//! `color.brand.value` → `--color-brand-value`
//! `type.fontSize.value` with prefix `ds` → `--ds-type-font-size-value`
//!
//! The function is pure. It is injective over paths whose keys are plain
//! lower-case alphanumerics; keys that differ only in case or separator style
//! (`fontSize` vs `font_size`) collide, and the schema validator reports such
//! collisions.

use crate::error::NamingError;
use crate::path::TokenPath;

/// The naming rule, carrying the optional namespace prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssNaming {
    prefix: Option<String>,
}

impl CssNaming {
    /// Naming without a namespace prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Naming with a namespace prefix, itself kebab-cased.
    ///
    /// # Errors
    ///
    /// `NamingError::EmptyPrefix` if the prefix has no alphanumeric content.
    pub fn with_prefix(prefix: &str) -> Result<Self, NamingError> {
        let normalized = kebab_segment(prefix.trim_start_matches('-'));
        if normalized.is_empty() {
            return Err(NamingError::EmptyPrefix {
                prefix: prefix.to_string(),
            });
        }
        Ok(Self {
            prefix: Some(normalized),
        })
    }

    /// The normalized namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The leading text every generated name starts with (`--` or `--ds-`).
    pub fn name_stem(&self) -> String {
        match &self.prefix {
            Some(p) => format!("--{p}-"),
            None => "--".to_string(),
        }
    }

    /// Custom-property name for a value path.
    pub fn var_name(&self, path: &TokenPath) -> String {
        let body = path
            .segments()
            .map(kebab_segment)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        format!("{}{body}", self.name_stem())
    }
}

/// Kebab-case a single key segment.
pub fn kebab_segment(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::with_capacity(segment.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary {
                push_hyphen(&mut out);
            }
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
        } else {
            push_hyphen(&mut out);
        }
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

fn push_hyphen(out: &mut String) {
    if !out.is_empty() && !out.ends_with('-') {
        out.push('-');
    }
}
