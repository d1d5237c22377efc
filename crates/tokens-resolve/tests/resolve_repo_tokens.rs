//! Integration test: resolve the repository's own token source
//! (`tokens/tokens.json`) and check it against the standard layer order.

use std::path::PathBuf;

use tokens_core::{parse_document, Literal, TokenDocument, TokenPath};
use tokens_resolve::{check_layering, resolve, LayerMap};

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn load_repo_tokens() -> TokenDocument {
    let path = repo_root().join("tokens").join("tokens.json");
    let text = std::fs::read_to_string(&path).expect("tokens/tokens.json should exist");
    parse_document(&text)
        .expect("tokens/tokens.json should parse")
        .document
}

#[test]
fn test_repo_tokens_resolve_completely() {
    let resolution = resolve(&load_repo_tokens());
    assert!(
        resolution.is_ok(),
        "unexpected diagnostics: {:?}",
        resolution.diagnostics()
    );
    assert!(resolution.unresolved().is_empty());
}

#[test]
fn test_component_aliases_reach_primitives() {
    let resolution = resolve(&load_repo_tokens());
    let bg = resolution
        .get(&TokenPath::new("component.button.bg.value"))
        .expect("button background resolves");
    assert_eq!(bg, &Literal::String("#5739FB".to_string()));

    let padding = resolution
        .get(&TokenPath::new("component.button.paddingX.value"))
        .expect("button padding resolves");
    assert_eq!(padding.as_text(), "16px");
}

#[test]
fn test_repo_tokens_respect_standard_layering() {
    let resolution = resolve(&load_repo_tokens());
    assert_eq!(resolution.graph().len(), 13);
    let violations = check_layering(resolution.graph(), &LayerMap::standard());
    assert!(violations.is_empty(), "layering violations: {violations:?}");
}
