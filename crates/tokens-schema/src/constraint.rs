//! # Constraint Documents
//!
//! The schema/constraint document names the categories a token document must
//! define, the value format each category's literals must satisfy, and an
//! optional JSON Schema applied to the raw token document.
//!
//! ```json
//! {
//!   "required": ["color", "spacing"],
//!   "formats": {
//!     "color": "hex-color",
//!     "motion": { "pattern": "^\\d+(ms|s)$", "description": "duration" }
//!   }
//! }
//! ```
//!
//! The document is checked against the embedded `constraint.schema.json`
//! meta-schema (Draft 2020-12) before it is interpreted.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use jsonschema::{Retrieve, Uri, Validator};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use tokens_core::Literal;

/// Meta-schema every constraint document must satisfy.
pub const CONSTRAINT_META_SCHEMA: &str = include_str!("../schemas/constraint.schema.json");

const HEX_COLOR: &str = r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$";
const DIMENSION: &str = r"^(?:0|-?(?:\d+|\d*\.\d+)(?:px|rem|em|%|vh|vw|pt|dp))$";
const DURATION: &str = r"^(?:\d+|\d*\.\d+)(?:ms|s)$";
const NUMBER: &str = r"^-?(?:\d+|\d*\.\d+)(?:[eE][+-]?\d+)?$";

/// The constraint document could not be interpreted.
#[derive(Error, Debug)]
pub enum ConstraintError {
    /// The document does not satisfy the constraint meta-schema.
    #[error("constraint document does not match its meta-schema:\n{0}")]
    MetaSchema(String),

    /// A format pattern is not a valid regular expression.
    #[error("format for category `{category}` is not a valid regex: {reason}")]
    BadPattern {
        /// Category the pattern belongs to.
        category: String,
        /// Regex compiler message.
        reason: String,
    },

    /// The embedded `document` JSON Schema does not compile.
    #[error("`document` is not a valid JSON Schema: {0}")]
    BadDocumentSchema(String),
}

/// A value-format predicate applied to a category's literals.
#[derive(Debug, Clone)]
pub struct ValueFormat {
    label: String,
    regex: Regex,
}

impl ValueFormat {
    /// Build from a named format (`hex-color`, `dimension`, `duration`, `number`).
    pub fn named(name: &str) -> Option<Self> {
        let (label, pattern) = match name {
            "hex-color" => ("hex color (#rgb or #rrggbb)", HEX_COLOR),
            "dimension" => ("dimension (number with a length unit, or 0)", DIMENSION),
            "duration" => ("duration (number with ms or s)", DURATION),
            "number" => ("number", NUMBER),
            _ => return None,
        };
        Regex::new(pattern).ok().map(|regex| Self {
            label: label.to_string(),
            regex,
        })
    }

    /// Build from a user pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compiler error.
    pub fn pattern(pattern: &str, description: Option<&str>) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        let label = match description {
            Some(d) => d.to_string(),
            None => format!("value matching /{pattern}/"),
        };
        Ok(Self { label, regex })
    }

    /// True if the literal's text form satisfies the format.
    pub fn matches(&self, literal: &Literal) -> bool {
        self.regex.is_match(&literal.as_text())
    }

    /// Human description used in violation messages.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Interpreted constraint document.
#[derive(Debug, Clone, Default)]
pub struct SchemaConstraint {
    required: Vec<String>,
    formats: IndexMap<String, ValueFormat>,
    document_schema: Option<Value>,
}

#[derive(Deserialize)]
struct ConstraintFile {
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    formats: BTreeMap<String, FormatSpec>,
    #[serde(default)]
    document: Option<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FormatSpec {
    Named(String),
    Pattern {
        pattern: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl SchemaConstraint {
    /// Constraint with only required categories.
    pub fn requiring<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: categories.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add or replace the format for a category.
    pub fn with_format(mut self, category: impl Into<String>, format: ValueFormat) -> Self {
        self.formats.insert(category.into(), format);
        self
    }

    /// Interpret a parsed constraint document.
    ///
    /// # Errors
    ///
    /// `ConstraintError::MetaSchema` if the document violates the meta-schema,
    /// `BadPattern` for an invalid format regex, `BadDocumentSchema` if the
    /// embedded document schema does not compile.
    pub fn from_value(value: &Value) -> Result<Self, ConstraintError> {
        check_meta_schema(value)?;

        let file: ConstraintFile = serde_json::from_value(value.clone())
            .map_err(|e| ConstraintError::MetaSchema(format!("  (root): {e}")))?;

        let mut formats = IndexMap::with_capacity(file.formats.len());
        for (category, spec) in file.formats {
            let format = match spec {
                FormatSpec::Named(name) => ValueFormat::named(&name).ok_or_else(|| {
                    ConstraintError::MetaSchema(format!(
                        "  /formats/{category}: unknown format {name:?}"
                    ))
                })?,
                FormatSpec::Pattern {
                    pattern,
                    description,
                } => ValueFormat::pattern(&pattern, description.as_deref()).map_err(|e| {
                    ConstraintError::BadPattern {
                        category: category.clone(),
                        reason: e.to_string(),
                    }
                })?,
            };
            formats.insert(category, format);
        }

        if let Some(schema) = &file.document {
            build_document_validator(schema).map_err(ConstraintError::BadDocumentSchema)?;
        }

        Ok(Self {
            required: file.required,
            formats,
            document_schema: file.document,
        })
    }

    /// Required top-level categories, in document order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Format predicate for a top-level category.
    pub fn format_for(&self, category: &str) -> Option<&ValueFormat> {
        self.formats.get(category)
    }

    /// Embedded JSON Schema for the raw token document.
    pub fn document_schema(&self) -> Option<&Value> {
        self.document_schema.as_ref()
    }
}

/// Retriever that keeps schema compilation offline. Constraint documents are
/// self-contained; any external `$ref` is refused.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema reference not allowed: {}", uri.as_str()).into())
    }
}

/// Compile a Draft 2020-12 validator with remote retrieval disabled.
pub(crate) fn build_document_validator(schema: &Value) -> Result<Validator, String> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.with_retriever(OfflineRetriever);
    opts.build(schema).map_err(|e| e.to_string())
}

fn check_meta_schema(value: &Value) -> Result<(), ConstraintError> {
    let meta: Value = serde_json::from_str(CONSTRAINT_META_SCHEMA)
        .map_err(|e| ConstraintError::MetaSchema(format!("  (meta-schema): {e}")))?;
    let validator = build_document_validator(&meta).map_err(ConstraintError::MetaSchema)?;

    let errors: Vec<String> = validator
        .iter_errors(value)
        .map(|e| {
            let at = e.instance_path.to_string();
            if at.is_empty() {
                format!("  (root): {e}")
            } else {
                format!("  {at}: {e}")
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConstraintError::MetaSchema(errors.join("\n")))
    }
}
