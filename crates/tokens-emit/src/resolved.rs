//! # Resolved Tokens
//!
//! The emitters' input: every leaf of a validated document with its
//! reference chain followed to a literal. It comes in two shapes built
//! together by [`flatten`]:
//!
//! - a flat list of [`ResolvedToken`]s in document order, for the CSS and
//!   union-type emitters;
//! - a [`ResolvedTree`] mirroring the source document, for the nested
//!   object and platform JSON emitters.

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use tokens_core::{CssNaming, Leaf, Literal, TokenDocument, TokenNode, TokenPath};
use tokens_resolve::Resolution;

/// Failure while preparing or rendering artifacts.
#[derive(Error, Debug)]
pub enum EmitError {
    /// A leaf has no resolved value. Emission requires a clean resolution.
    #[error("token `{path}` has no resolved value")]
    Unresolved {
        /// Value path of the leaf.
        path: TokenPath,
    },

    /// A tree could not be serialized.
    #[error("cannot serialize {artifact}: {source}")]
    Serialize {
        /// Artifact being rendered.
        artifact: &'static str,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// One token, fully resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedToken {
    /// Value path (`color.brand.value`).
    pub path: TokenPath,
    /// Generated custom-property name (`--color-brand-value`).
    pub css_var: String,
    /// Terminal literal.
    pub value: Literal,
    /// Optional token type.
    pub token_type: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

/// A resolved leaf as it appears in nested output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLeaf {
    /// Terminal literal.
    pub value: Literal,
    /// Optional token type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A node of the resolved tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolvedNode {
    /// A resolved token.
    Leaf(ResolvedLeaf),
    /// Named children, in source order.
    Group(IndexMap<String, ResolvedNode>),
}

/// The source document's shape with every leaf resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedTree {
    categories: IndexMap<String, ResolvedNode>,
}

impl ResolvedTree {
    /// Top-level categories in source order.
    pub fn categories(&self) -> &IndexMap<String, ResolvedNode> {
        &self.categories
    }
}

/// Everything the emitters read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedTokens {
    /// Flat list in document order.
    pub tokens: Vec<ResolvedToken>,
    /// Mirrored tree.
    pub tree: ResolvedTree,
}

impl ResolvedTokens {
    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if the document had no leaves.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Combine a document with its resolution.
///
/// # Errors
///
/// `EmitError::Unresolved` if any leaf is missing from the resolution.
pub fn flatten(
    document: &TokenDocument,
    resolution: &Resolution,
    naming: &CssNaming,
) -> Result<ResolvedTokens, EmitError> {
    let mut tokens = Vec::new();
    let mut categories = IndexMap::with_capacity(document.categories().len());
    for (key, node) in document.categories() {
        let path = TokenPath::root(key);
        let resolved = mirror(&path, node, resolution, naming, &mut tokens)?;
        categories.insert(key.clone(), resolved);
    }
    tracing::debug!(tokens = tokens.len(), "flattened resolved tokens");
    Ok(ResolvedTokens {
        tokens,
        tree: ResolvedTree { categories },
    })
}

// Document depth is bounded by the JSON parser's nesting limit.
fn mirror(
    path: &TokenPath,
    node: &TokenNode,
    resolution: &Resolution,
    naming: &CssNaming,
    tokens: &mut Vec<ResolvedToken>,
) -> Result<ResolvedNode, EmitError> {
    match node {
        TokenNode::Leaf(leaf) => {
            let token = resolve_leaf(path.value_path(), leaf, resolution, naming)?;
            let resolved = ResolvedLeaf {
                value: token.value.clone(),
                token_type: token.token_type.clone(),
                description: token.description.clone(),
            };
            tokens.push(token);
            Ok(ResolvedNode::Leaf(resolved))
        }
        TokenNode::Group(children) => {
            let mut group = IndexMap::with_capacity(children.len());
            for (key, child) in children {
                let resolved = mirror(&path.child(key), child, resolution, naming, tokens)?;
                group.insert(key.clone(), resolved);
            }
            Ok(ResolvedNode::Group(group))
        }
    }
}

fn resolve_leaf(
    value_path: TokenPath,
    leaf: &Leaf,
    resolution: &Resolution,
    naming: &CssNaming,
) -> Result<ResolvedToken, EmitError> {
    let value = resolution
        .get(&value_path)
        .cloned()
        .ok_or_else(|| EmitError::Unresolved {
            path: value_path.clone(),
        })?;
    Ok(ResolvedToken {
        css_var: naming.var_name(&value_path),
        path: value_path,
        value,
        token_type: leaf.token_type.clone(),
        description: leaf.description.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokens_core::parse_document;
    use tokens_resolve::resolve;

    fn build(source: &str) -> ResolvedTokens {
        let doc = parse_document(source).unwrap().document;
        let resolution = resolve(&doc);
        flatten(&doc, &resolution, &CssNaming::new()).unwrap()
    }

    #[test]
    fn flat_list_follows_document_order() {
        let set = build(
            r##"{
                "spacing": {"md": {"value": "16px"}},
                "color": {"brand": {"value": "#5739FB"}, "accent": {"value": "{color.brand}"}}
            }"##,
        );
        let paths: Vec<&str> = set.tokens.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(
            paths,
            ["spacing.md.value", "color.brand.value", "color.accent.value"]
        );
        assert_eq!(set.tokens[2].css_var, "--color-accent-value");
        assert_eq!(set.tokens[2].value.as_text(), "#5739FB");
    }

    #[test]
    fn tree_mirrors_document_with_metadata() {
        let set = build(
            r##"{"color": {"brand": {"value": "#5739FB", "type": "color", "description": "Brand"}}}"##,
        );
        let json = serde_json::to_value(&set.tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "color": {"brand": {"value": "#5739FB", "type": "color", "description": "Brand"}}
            })
        );
    }

    #[test]
    fn absent_metadata_is_omitted() {
        let set = build(r#"{"type": {"weight": {"value": 400}}}"#);
        let json = serde_json::to_string(&set.tree).unwrap();
        assert_eq!(json, r#"{"type":{"weight":{"value":400}}}"#);
    }

    #[test]
    fn unresolved_leaf_is_an_error() {
        let doc = parse_document(r#"{"a": {"x": {"value": "{a.missing}"}}}"#)
            .unwrap()
            .document;
        let resolution = resolve(&doc);
        let err = flatten(&doc, &resolution, &CssNaming::new()).unwrap_err();
        assert!(matches!(err, EmitError::Unresolved { ref path } if path.as_str() == "a.x.value"));
    }

    #[test]
    fn prefixed_naming_reaches_css_var() {
        let doc = parse_document(r#"{"spacing": {"md": {"value": "16px"}}}"#)
            .unwrap()
            .document;
        let set = flatten(&doc, &resolve(&doc), &CssNaming::with_prefix("ds").unwrap()).unwrap();
        assert_eq!(set.tokens[0].css_var, "--ds-spacing-md-value");
    }
}
