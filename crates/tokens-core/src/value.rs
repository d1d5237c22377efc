//! # Token Values
//!
//! A leaf's raw value is either a terminal [`Literal`] or a reference to
//! another token's path. [`parse_raw_value`] is the only place that decides
//! which: a string is a reference iff it is exactly `{`, one or more of
//! `[A-Za-z0-9_.-]`, then `}`.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Number;

use crate::path::TokenPath;

/// A terminal token value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// A string value such as `#5739FB` or `16px`.
    String(String),
    /// A JSON number such as `1.5` or `400`.
    Number(Number),
}

impl Literal {
    /// The literal's textual form, as emitted into CSS.
    pub fn as_text(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for Literal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => n.serialize(serializer),
        }
    }
}

/// A leaf value as written in the source document.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A terminal value.
    Literal(Literal),
    /// A pointer to another token.
    Reference(TokenPath),
}

impl RawValue {
    /// The referenced path, if this is a reference.
    pub fn reference(&self) -> Option<&TokenPath> {
        match self {
            Self::Reference(p) => Some(p),
            Self::Literal(_) => None,
        }
    }

    /// The literal, if this is not a reference.
    pub fn literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            Self::Reference(_) => None,
        }
    }
}

impl From<Number> for RawValue {
    fn from(n: Number) -> Self {
        Self::Literal(Literal::Number(n))
    }
}

/// Classify a string leaf value as a reference or a literal.
pub fn parse_raw_value(text: &str) -> RawValue {
    match reference_target(text) {
        Some(path) => RawValue::Reference(TokenPath::new(path)),
        None => {
            if text.starts_with('{') && text.ends_with('}') {
                tracing::warn!(value = text, "brace-wrapped value is not a valid reference; treating as literal");
            }
            RawValue::Literal(Literal::String(text.to_string()))
        }
    }
}

fn reference_target(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    let valid = !inner.is_empty()
        && inner
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'));
    valid.then_some(inner)
}
