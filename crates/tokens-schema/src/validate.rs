//! # Schema Validation
//!
//! Checks a loaded token document against its constraint document.
//!
//! ## Aggregate Mode
//!
//! Validation never stops at the first problem. Every rule runs over the
//! whole document and every violation is collected into one
//! [`ValidationReport`], so a single run surfaces the complete set of
//! problems. A report that is not ok blocks resolution entirely.
//!
//! ## Rules
//!
//! 1. Required top-level categories are present.
//! 2. Every key uses only `[A-Za-z0-9_-]` and contains at least one letter
//!    or digit, so it contributes a segment to its CSS variable name.
//! 3. No literal contains `;`, `{`, `}` or a control character. Such a value
//!    would end its declaration in `tokens.css`.
//! 4. Literal leaves under a category with a declared format satisfy it.
//!    References are skipped here. Once resolved, their values are checked
//!    with [`check_resolved_formats`].
//! 5. The constraint's embedded JSON Schema, if any, accepts the raw document.
//! 6. No two value paths generate the same CSS variable name.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use tokens_core::{CssNaming, Literal, TokenDocument, TokenPath};

use crate::constraint::{build_document_validator, SchemaConstraint};

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path of the offending node, or `(root)`.
    pub path: String,
    /// Human-readable reason.
    pub reason: String,
}

impl FieldError {
    fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// All violations found in one validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    violations: Vec<FieldError>,
}

impl ValidationReport {
    /// True if no violations were found.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Violations in the order the rules found them.
    pub fn violations(&self) -> &[FieldError] {
        &self.violations
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.violations
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}

/// Validate a document against a constraint, collecting every violation.
///
/// `raw` is the same document as a plain JSON value (see
/// [`tokens_core::ParsedDocument`]); it is only consulted when the constraint
/// carries an embedded JSON Schema.
pub fn validate_document(
    document: &TokenDocument,
    raw: &Value,
    constraint: &SchemaConstraint,
    naming: &CssNaming,
) -> ValidationReport {
    let mut violations = Vec::new();

    for category in constraint.required() {
        if !document.has_category(category) {
            violations.push(FieldError::new(
                category.as_str(),
                format!("missing required category `{category}`"),
            ));
        }
    }

    for entry in document.nodes() {
        if !is_valid_key(entry.key) {
            violations.push(FieldError::new(
                entry.path.as_str(),
                format!(
                    "key {:?} must use only letters, digits, `_` or `-` and contain a letter or digit",
                    entry.key
                ),
            ));
        }
    }

    for entry in document.leaves() {
        let Some(literal) = entry.leaf.value.literal() else {
            continue;
        };
        let text = literal.as_text();
        if let Some(bad) = text.chars().find(|&c| is_unsafe_in_css(c)) {
            violations.push(FieldError::new(
                entry.value_path().as_str(),
                format!("{text:?} contains {bad:?}, which cannot appear in a css value"),
            ));
        }
    }

    for entry in document.leaves() {
        let Some(format) = constraint.format_for(entry.node_path.category()) else {
            continue;
        };
        let Some(literal) = entry.leaf.value.literal() else {
            continue;
        };
        if !format.matches(literal) {
            violations.push(FieldError::new(
                entry.value_path().as_str(),
                format!("{:?} is not a valid {format}", literal.as_text()),
            ));
        }
    }

    if let Some(schema) = constraint.document_schema() {
        check_document_schema(schema, raw, &mut violations);
    }

    let mut generated: IndexMap<String, TokenPath> = IndexMap::new();
    for entry in document.leaves() {
        let path = entry.value_path();
        let name = naming.var_name(&path);
        if let Some(first) = generated.get(&name) {
            violations.push(FieldError::new(
                path.as_str(),
                format!("css variable `{name}` is already generated for `{first}`"),
            ));
        } else {
            generated.insert(name, path);
        }
    }

    tracing::debug!(violations = violations.len(), "schema validation finished");
    ValidationReport { violations }
}

/// Check the resolved value of every reference against the format of the
/// category the reference lives in.
///
/// `resolved` looks up a leaf's final literal by value path. Leaves it has
/// no value for are skipped; the resolver already reported them.
pub fn check_resolved_formats<'a>(
    document: &TokenDocument,
    constraint: &SchemaConstraint,
    resolved: impl Fn(&TokenPath) -> Option<&'a Literal>,
) -> Vec<FieldError> {
    let mut violations = Vec::new();
    for entry in document.leaves() {
        let Some(target) = entry.leaf.value.reference() else {
            continue;
        };
        let Some(format) = constraint.format_for(entry.node_path.category()) else {
            continue;
        };
        let path = entry.value_path();
        let Some(literal) = resolved(&path) else {
            continue;
        };
        if !format.matches(literal) {
            violations.push(FieldError::new(
                path.as_str(),
                format!(
                    "{{{target}}} resolves to {:?}, which is not a valid {format}",
                    literal.as_text()
                ),
            ));
        }
    }
    tracing::debug!(violations = violations.len(), "resolved format check finished");
    violations
}

fn is_valid_key(key: &str) -> bool {
    key.bytes().any(|b| b.is_ascii_alphanumeric())
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

fn is_unsafe_in_css(c: char) -> bool {
    matches!(c, ';' | '{' | '}') || c.is_control()
}

fn check_document_schema(schema: &Value, raw: &Value, violations: &mut Vec<FieldError>) {
    let validator = match build_document_validator(schema) {
        Ok(v) => v,
        Err(reason) => {
            violations.push(FieldError::new("(schema)", reason));
            return;
        }
    };
    for error in validator.iter_errors(raw) {
        let pointer = error.instance_path.to_string();
        violations.push(FieldError::new(pointer_to_path(&pointer), error.to_string()));
    }
}

/// Convert a JSON Pointer (`/color/brand/value`) to a dotted path.
fn pointer_to_path(pointer: &str) -> String {
    if pointer.is_empty() || pointer == "/" {
        return "(root)".to_string();
    }
    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}
