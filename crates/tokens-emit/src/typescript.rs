//! # Typed Module Emitters
//!
//! `theme.ts` carries the runtime object; `index.d.ts` carries the matching
//! declarations for consumers that only want the types. Both close over the
//! same two string-literal unions:
//!
//! - `TokenPath`: every value path (`"color.brand.value"`),
//! - `CssVar`: every generated custom property (`"--color-brand-value"`).
//!
//! An empty document yields `never` for both.

use indexmap::IndexMap;

use tokens_core::Literal;

use crate::resolved::{ResolvedLeaf, ResolvedNode, ResolvedToken, ResolvedTokens};

const HEADER: &str = "// Generated from the design token source. Do not edit.\n";
const INDENT: &str = "  ";

/// Render `theme.ts`.
pub fn render_typescript(resolved: &ResolvedTokens) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    out.push_str("export const tokens = ");
    write_object(&mut out, resolved.tree.categories(), 0, Style::Value);
    out.push_str(" as const;\n\n");
    write_unions(&mut out, &resolved.tokens);
    out.push_str("\nexport const cssVars: Record<TokenPath, CssVar> = {");
    if resolved.tokens.is_empty() {
        out.push_str("};\n");
        return out;
    }
    out.push('\n');
    for token in &resolved.tokens {
        out.push_str(&format!(
            "{INDENT}{}: {},\n",
            quote(token.path.as_str()),
            quote(&token.css_var)
        ));
    }
    out.push_str("};\n");
    out
}

/// Render `index.d.ts`.
pub fn render_declarations(resolved: &ResolvedTokens) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    out.push_str("export type Tokens = ");
    write_object(&mut out, resolved.tree.categories(), 0, Style::Type);
    out.push_str(";\n\n");
    out.push_str("export declare const tokens: Tokens;\n\n");
    write_unions(&mut out, &resolved.tokens);
    out.push_str("\nexport declare const cssVars: Record<TokenPath, CssVar>;\n");
    out
}

/// Object literal (`key: "v",`) or type literal (`readonly key: "v";`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Value,
    Type,
}

impl Style {
    fn key_prefix(self) -> &'static str {
        match self {
            Self::Value => "",
            Self::Type => "readonly ",
        }
    }

    fn terminator(self) -> char {
        match self {
            Self::Value => ',',
            Self::Type => ';',
        }
    }
}

fn write_object(
    out: &mut String,
    entries: &IndexMap<String, ResolvedNode>,
    depth: usize,
    style: Style,
) {
    if entries.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    let pad = INDENT.repeat(depth + 1);
    for (key, node) in entries {
        out.push_str(&format!("{pad}{}{}: ", style.key_prefix(), property_key(key)));
        match node {
            ResolvedNode::Leaf(leaf) => write_leaf(out, leaf, depth + 1, style),
            ResolvedNode::Group(children) => write_object(out, children, depth + 1, style),
        }
        out.push(style.terminator());
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
}

fn write_leaf(out: &mut String, leaf: &ResolvedLeaf, depth: usize, style: Style) {
    let pad = INDENT.repeat(depth + 1);
    let prefix = style.key_prefix();
    let end = style.terminator();
    out.push_str("{\n");
    out.push_str(&format!("{pad}{prefix}value: {}{end}\n", literal(&leaf.value)));
    if let Some(token_type) = &leaf.token_type {
        out.push_str(&format!("{pad}{prefix}type: {}{end}\n", quote(token_type)));
    }
    if let Some(description) = &leaf.description {
        out.push_str(&format!("{pad}{prefix}description: {}{end}\n", quote(description)));
    }
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
}

fn write_unions(out: &mut String, tokens: &[ResolvedToken]) {
    write_union(out, "TokenPath", tokens.iter().map(|t| t.path.as_str()));
    out.push('\n');
    write_union(out, "CssVar", tokens.iter().map(|t| t.css_var.as_str()));
}

fn write_union<'a>(out: &mut String, name: &str, members: impl Iterator<Item = &'a str>) {
    let mut members = members.peekable();
    if members.peek().is_none() {
        out.push_str(&format!("export type {name} = never;\n"));
        return;
    }
    out.push_str(&format!("export type {name} =\n"));
    while let Some(member) = members.next() {
        let end = if members.peek().is_none() { ";" } else { "" };
        out.push_str(&format!("{INDENT}| {}{end}\n", quote(member)));
    }
}

/// A TypeScript literal for a token value. Numbers stay numeric.
fn literal(value: &Literal) -> String {
    match value {
        Literal::String(s) => quote(s),
        Literal::Number(n) => n.to_string(),
    }
}

/// Double-quoted string with JSON escaping, which TypeScript accepts.
fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Bare identifiers stay bare; anything else is quoted.
fn property_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        quote(key)
    }
}
