//! # Token Documents
//!
//! Parses token source text into an ordered, typed tree.
//!
//! The source is read once into an order-preserving intermediate value
//! (`serde_json::Value` sorts object keys unless `preserve_order` is enabled
//! workspace-wide, so it cannot carry document order). The intermediate value
//! is then converted twice: into the typed [`TokenDocument`], and into a plain
//! `serde_json::Value` for JSON Schema validation.
//!
//! Nesting depth is bounded by `serde_json`'s recursion limit, which applies
//! to the intermediate value's visitor as well, so the conversion below can
//! recurse safely.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Number, Value};

use crate::error::ParseError;
use crate::path::{TokenPath, VALUE_KEY};
use crate::value::{parse_raw_value, RawValue};

/// Ordered children of a group.
pub type TokenGroup = IndexMap<String, TokenNode>;

/// A token or a group of tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenNode {
    /// A single token.
    Leaf(Leaf),
    /// Named children, in source order.
    Group(TokenGroup),
}

/// A single design token.
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    /// Literal or reference, as written.
    pub value: RawValue,
    /// Optional token type, e.g. `color`.
    pub token_type: Option<String>,
    /// Optional human description.
    pub description: Option<String>,
}

/// An ordered mapping from top-level category to its node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenDocument {
    categories: IndexMap<String, TokenNode>,
}

/// A node visited by [`TokenDocument::nodes`].
#[derive(Debug, Clone)]
pub struct NodeEntry<'a> {
    /// Node path of this node.
    pub path: TokenPath,
    /// Key of this node within its parent.
    pub key: &'a str,
    /// The node itself.
    pub node: &'a TokenNode,
}

/// A leaf visited by [`TokenDocument::leaves`].
#[derive(Debug, Clone)]
pub struct LeafEntry<'a> {
    /// Node path of the leaf (`color.brand`).
    pub node_path: TokenPath,
    /// The leaf.
    pub leaf: &'a Leaf,
}

impl LeafEntry<'_> {
    /// Value path of the leaf (`color.brand.value`).
    pub fn value_path(&self) -> TokenPath {
        self.node_path.value_path()
    }
}

impl TokenDocument {
    /// Top-level categories in source order.
    pub fn categories(&self) -> &IndexMap<String, TokenNode> {
        &self.categories
    }

    /// True if a top-level category with this name exists.
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Look up a node by node path.
    pub fn get(&self, path: &TokenPath) -> Option<&TokenNode> {
        let mut segments = path.segments();
        let mut node = self.categories.get(segments.next()?)?;
        for key in segments {
            match node {
                TokenNode::Group(children) => node = children.get(key)?,
                TokenNode::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// Every node in depth-first pre-order, children in source order.
    pub fn nodes(&self) -> Vec<NodeEntry<'_>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeEntry<'_>> = self
            .categories
            .iter()
            .rev()
            .map(|(k, node)| NodeEntry {
                path: TokenPath::root(k),
                key: k.as_str(),
                node,
            })
            .collect();
        while let Some(entry) = stack.pop() {
            if let TokenNode::Group(children) = entry.node {
                for (k, child) in children.iter().rev() {
                    stack.push(NodeEntry {
                        path: entry.path.child(k),
                        key: k.as_str(),
                        node: child,
                    });
                }
            }
            out.push(entry);
        }
        out
    }

    /// Every leaf in depth-first pre-order. This is the document traversal
    /// order used for resolution diagnostics and emission.
    pub fn leaves(&self) -> Vec<LeafEntry<'_>> {
        self.nodes()
            .into_iter()
            .filter_map(|entry| match entry.node {
                TokenNode::Leaf(leaf) => Some(LeafEntry {
                    node_path: entry.path,
                    leaf,
                }),
                TokenNode::Group(_) => None,
            })
            .collect()
    }
}

/// Result of parsing token source text.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// The typed, ordered tree.
    pub document: TokenDocument,
    /// The same content as a plain JSON value, for JSON Schema checks.
    pub raw: Value,
}

/// Parse token source text.
///
/// # Errors
///
/// `ParseError::Syntax` for malformed JSON; `ParseError::Structure` when the
/// JSON is not a token tree (non-object root or category, a bare scalar inside
/// a group, or an unsupported `value` type).
pub fn parse_document(text: &str) -> Result<ParsedDocument, ParseError> {
    let ordered: OrderedValue = serde_json::from_str(text)?;
    let raw = ordered.to_json();

    let top = match ordered {
        OrderedValue::Object(top) => top,
        other => {
            return Err(ParseError::structure(
                "(root)",
                format!("expected an object of categories, found {}", other.kind()),
            ))
        }
    };

    let mut categories = IndexMap::with_capacity(top.len());
    for (key, value) in top {
        let path = TokenPath::root(&key);
        let node = convert_node(&path, value)?;
        categories.insert(key, node);
    }

    Ok(ParsedDocument {
        document: TokenDocument { categories },
        raw,
    })
}

fn convert_node(path: &TokenPath, value: OrderedValue) -> Result<TokenNode, ParseError> {
    let mut map = match value {
        OrderedValue::Object(map) => map,
        other => {
            return Err(ParseError::structure(
                path.as_str(),
                format!(
                    "expected a token (object with `value`) or a group, found {}",
                    other.kind()
                ),
            ))
        }
    };

    if let Some(raw) = map.shift_remove(VALUE_KEY) {
        let value = match raw {
            OrderedValue::String(s) => parse_raw_value(&s),
            OrderedValue::Number(n) => RawValue::from(n),
            other => {
                return Err(ParseError::structure(
                    path.value_path().as_str(),
                    format!("token values must be strings or numbers, found {}", other.kind()),
                ))
            }
        };
        let token_type = metadata_string(path, &mut map, "type")?;
        let description = metadata_string(path, &mut map, "description")?;
        return Ok(TokenNode::Leaf(Leaf {
            value,
            token_type,
            description,
        }));
    }

    let mut children = TokenGroup::with_capacity(map.len());
    for (key, child) in map {
        let child_path = path.child(&key);
        children.insert(key, convert_node(&child_path, child)?);
    }
    Ok(TokenNode::Group(children))
}

fn metadata_string(
    path: &TokenPath,
    map: &mut IndexMap<String, OrderedValue>,
    key: &str,
) -> Result<Option<String>, ParseError> {
    match map.shift_remove(key) {
        None => Ok(None),
        Some(OrderedValue::String(s)) => Ok(Some(s)),
        Some(other) => Err(ParseError::structure(
            path.child(key).as_str(),
            format!("token `{key}` must be a string, found {}", other.kind()),
        )),
    }
}

/// JSON value that keeps object keys in source order.
#[derive(Debug, Clone)]
enum OrderedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<OrderedValue>),
    Object(IndexMap<String, OrderedValue>),
}

impl OrderedValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "a boolean",
            Self::Number(_) => "a number",
            Self::String(_) => "a string",
            Self::Array(_) => "an array",
            Self::Object(_) => "an object",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for OrderedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OrderedValueVisitor)
    }
}

struct OrderedValueVisitor;

impl<'de> Visitor<'de> for OrderedValueVisitor {
    type Value = OrderedValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(OrderedValue::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(OrderedValue::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(OrderedValue::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(OrderedValue::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Number::from_f64(v)
            .map(OrderedValue::Number)
            .ok_or_else(|| E::custom(format!("cannot represent {v} as a JSON number")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(OrderedValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(OrderedValue::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(OrderedValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, OrderedValue>()? {
            map.insert(key, value);
        }
        Ok(OrderedValue::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Literal;

    fn parse(text: &str) -> TokenDocument {
        parse_document(text).unwrap().document
    }

    #[test]
    fn leaves_are_typed_and_ordered() {
        let doc = parse(
            r##"{
                "spacing": {"md": {"value": "16px"}},
                "color": {
                    "zeta": {"value": "#000"},
                    "alpha": {"value": "{color.zeta}", "type": "color", "description": "Alias"}
                }
            }"##,
        );
        let paths: Vec<String> = doc
            .leaves()
            .iter()
            .map(|l| l.value_path().to_string())
            .collect();
        assert_eq!(
            paths,
            ["spacing.md.value", "color.zeta.value", "color.alpha.value"]
        );

        let Some(TokenNode::Leaf(alpha)) = doc.get(&TokenPath::new("color.alpha")) else {
            panic!("color.alpha should be a leaf");
        };
        assert_eq!(alpha.value, RawValue::Reference(TokenPath::new("color.zeta")));
        assert_eq!(alpha.token_type.as_deref(), Some("color"));
        assert_eq!(alpha.description.as_deref(), Some("Alias"));
    }

    #[test]
    fn numeric_values_are_literals() {
        let doc = parse(r#"{"type": {"weight": {"value": 600}}}"#);
        let leaves = doc.leaves();
        assert!(matches!(
            leaves[0].leaf.value,
            RawValue::Literal(Literal::Number(_))
        ));
    }

    #[test]
    fn raw_value_mirrors_document() {
        let parsed = parse_document(r##"{"color": {"brand": {"value": "#fff"}}}"##).unwrap();
        assert_eq!(parsed.raw["color"]["brand"]["value"], "#fff");
    }

    #[test]
    fn syntax_error_carries_line() {
        let err = parse_document("{\n  \"color\": {,\n}").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = parse_document("[1, 2]").unwrap_err();
        assert!(matches!(err, ParseError::Structure { ref path, .. } if path == "(root)"));
    }

    #[test]
    fn bare_scalar_in_group_is_rejected() {
        let err = parse_document(r##"{"color": {"brand": "#fff"}}"##).unwrap_err();
        match err {
            ParseError::Structure { path, .. } => assert_eq!(path, "color.brand"),
            other => panic!("expected Structure, got {other}"),
        }
    }

    #[test]
    fn boolean_value_is_rejected() {
        let err = parse_document(r#"{"flag": {"on": {"value": true}}}"#).unwrap_err();
        match err {
            ParseError::Structure { path, .. } => assert_eq!(path, "flag.on.value"),
            other => panic!("expected Structure, got {other}"),
        }
    }

    #[test]
    fn non_string_description_is_rejected() {
        let err =
            parse_document(r#"{"a": {"b": {"value": "1px", "description": 3}}}"#).unwrap_err();
        assert!(matches!(err, ParseError::Structure { ref path, .. } if path == "a.b.description"));
    }

    #[test]
    fn get_stops_at_leaves() {
        let doc = parse(r#"{"a": {"b": {"value": "1px"}}}"#);
        assert!(doc.get(&TokenPath::new("a.b")).is_some());
        assert!(doc.get(&TokenPath::new("a.b.c")).is_none());
        assert!(doc.get(&TokenPath::new("missing")).is_none());
    }

    #[test]
    fn nodes_visit_groups_before_children() {
        let doc = parse(r#"{"a": {"b": {"c": {"value": "1"}}, "d": {"value": "2"}}}"#);
        let paths: Vec<String> = doc.nodes().iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, ["a", "a.b", "a.b.c", "a.d"]);
    }
}
