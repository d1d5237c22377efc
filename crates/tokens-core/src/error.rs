//! # Error Types
//!
//! Errors raised while turning source text into a typed token tree, and while
//! configuring the naming rule. Both are fatal to a pipeline run: the callers
//! in `tokens-schema` attach the offending file and a content preview before
//! surfacing them.

use thiserror::Error;

/// The token source text could not be turned into a [`TokenDocument`](crate::TokenDocument).
#[derive(Error, Debug)]
pub enum ParseError {
    /// The text is not well-formed JSON.
    #[error("invalid JSON: {message}")]
    Syntax {
        /// 1-based line reported by the JSON parser.
        line: usize,
        /// 1-based column reported by the JSON parser.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// The JSON is well-formed but is not a token tree.
    #[error("invalid token tree at `{path}`: {reason}")]
    Structure {
        /// Dotted path of the offending node, or `(root)`.
        path: String,
        /// What was expected at that node.
        reason: String,
    },
}

impl ParseError {
    /// Line number of the failure, when the parser reported one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. } if *line > 0 => Some(*line),
            _ => None,
        }
    }

    pub(crate) fn structure(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structure {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Syntax {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        }
    }
}

/// The configured CSS namespace prefix is unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    /// The prefix reduces to nothing after kebab-casing.
    #[error("css namespace prefix {prefix:?} contains no usable characters")]
    EmptyPrefix {
        /// The prefix as configured.
        prefix: String,
    },
}
