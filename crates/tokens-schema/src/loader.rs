//! # Loader
//!
//! Reads the token source document and the constraint document from disk.
//! Every failure here is fatal to the run: a missing file, an unreadable
//! file, or content that does not parse. Parse failures carry the file and a
//! short preview of the offending line.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use tokens_core::{parse_document, ParseError, ParsedDocument, TokenDocument};

use crate::constraint::SchemaConstraint;

/// Longest preview shown for a parse failure.
const PREVIEW_CHARS: usize = 80;

/// Fatal failure while loading pipeline inputs.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The input file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The input file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The input file's content is malformed.
    #[error("parse error in {}: {reason}\n  near: {preview}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// What went wrong.
        reason: String,
        /// The offending line, truncated.
        preview: String,
    },
}

/// Both pipeline inputs, parsed.
#[derive(Debug, Clone)]
pub struct Inputs {
    /// The typed token tree.
    pub document: TokenDocument,
    /// The token document as a plain JSON value.
    pub raw: Value,
    /// The interpreted constraint document.
    pub constraint: SchemaConstraint,
}

/// Load the token document and the constraint document.
///
/// # Errors
///
/// Returns the first fatal [`LoadError`]; the token document is read first.
pub fn load_inputs(tokens_path: &Path, schema_path: &Path) -> Result<Inputs, LoadError> {
    let ParsedDocument { document, raw } = load_document(tokens_path)?;
    let constraint = load_constraint(schema_path)?;
    tracing::info!(
        tokens = %tokens_path.display(),
        schema = %schema_path.display(),
        categories = document.categories().len(),
        "loaded inputs"
    );
    Ok(Inputs {
        document,
        raw,
        constraint,
    })
}

/// Load and parse a token source document.
///
/// # Errors
///
/// `LoadError::FileNotFound`, `LoadError::Io`, or `LoadError::Parse`.
pub fn load_document(path: &Path) -> Result<ParsedDocument, LoadError> {
    let text = read_source(path)?;
    parse_document(&text).map_err(|e| {
        let line = match &e {
            ParseError::Syntax { .. } => e.line(),
            ParseError::Structure { path: at, .. } => line_of_key(&text, at),
        };
        LoadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
            preview: preview(&text, line),
        }
    })
}

/// Load and interpret a constraint document.
///
/// # Errors
///
/// `LoadError::FileNotFound`, `LoadError::Io`, or `LoadError::Parse` (for
/// malformed JSON and for documents rejected by the meta-schema).
pub fn load_constraint(path: &Path) -> Result<SchemaConstraint, LoadError> {
    let text = read_source(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        reason: format!("invalid JSON: {e}"),
        preview: preview(&text, Some(e.line())),
    })?;
    SchemaConstraint::from_value(&value).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
        preview: preview(&text, None),
    })
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    tracing::debug!(path = %path.display(), "reading source");
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Line (1-based) where the last key of a dotted path first appears.
fn line_of_key(text: &str, dotted: &str) -> Option<usize> {
    let key = dotted.rsplit('.').next().filter(|k| !k.is_empty() && *k != "(root)")?;
    let needle = format!("\"{key}\"");
    text.lines().position(|l| l.contains(&needle)).map(|i| i + 1)
}

/// The given line (or the first non-blank line), trimmed and truncated.
fn preview(text: &str, line: Option<usize>) -> String {
    let chosen = line
        .and_then(|n| text.lines().nth(n.saturating_sub(1)))
        .or_else(|| text.lines().find(|l| !l.trim().is_empty()))
        .unwrap_or("")
        .trim();
    if chosen.chars().count() > PREVIEW_CHARS {
        let cut: String = chosen.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else if chosen.is_empty() {
        "(empty file)".to_string()
    } else {
        chosen.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_both_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = write(&dir, "tokens.json", r##"{"color": {"brand": {"value": "#5739FB"}}}"##);
        let schema = write(&dir, "schema.json", r#"{"required": ["color"]}"#);
        let inputs = load_inputs(&tokens, &schema).unwrap();
        assert!(inputs.document.has_category("color"));
        assert_eq!(inputs.constraint.required(), ["color"]);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(&dir, "schema.json", "{}");
        let err = load_inputs(&dir.path().join("nope.json"), &schema).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }), "{err}");

        let tokens = write(&dir, "tokens.json", "{}");
        let err = load_inputs(&tokens, &dir.path().join("missing.schema.json")).unwrap_err();
        match err {
            LoadError::FileNotFound { path } => assert!(path.ends_with("missing.schema.json")),
            other => panic!("expected FileNotFound, got {other}"),
        }
    }

    #[test]
    fn malformed_json_includes_file_and_preview() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = write(&dir, "tokens.json", "{\n  \"color\": {\"brand\": oops}\n}");
        let err = load_document(&tokens).unwrap_err();
        match &err {
            LoadError::Parse { path, preview, .. } => {
                assert!(path.ends_with("tokens.json"));
                assert!(preview.contains("oops"), "preview was {preview:?}");
            }
            other => panic!("expected Parse, got {other}"),
        }
        assert!(err.to_string().contains("tokens.json"));
    }

    #[test]
    fn structure_error_previews_the_offending_key() {
        let dir = tempfile::tempdir().unwrap();
        let tokens = write(
            &dir,
            "tokens.json",
            "{\n  \"color\": {\n    \"brand\": \"#fff\"\n  }\n}",
        );
        let err = load_document(&tokens).unwrap_err();
        match err {
            LoadError::Parse { preview, .. } => assert_eq!(preview, "\"brand\": \"#fff\""),
            other => panic!("expected Parse, got {other}"),
        }
    }

    #[test]
    fn meta_schema_rejection_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let schema = write(&dir, "schema.json", r#"{"required": "color"}"#);
        let err = load_constraint(&schema).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "{err}");
    }

    #[test]
    fn preview_truncates_long_lines() {
        let long = "x".repeat(200);
        let p = preview(&long, Some(1));
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert_eq!(preview("", None), "(empty file)");
    }
}
