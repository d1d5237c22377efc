//! # Reference Resolver
//!
//! Follows every reference chain in a validated document to its terminal
//! literal.
//!
//! Each leaf carries a tri-state visit marker:
//!
//! - `Unvisited`: not yet reached.
//! - `InProgress`: on the chain currently being walked. Reaching an
//!   `InProgress` leaf again means the chain has closed into a cycle.
//! - `Done`: the leaf's outcome is memoized.
//!
//! Each reference has exactly one target, so a chain walk is a loop with an
//! explicit chain stack rather than native recursion; arbitrarily long alias
//! chains cannot overflow the call stack. Once a walk ends, every leaf on the
//! chain receives the walk's outcome.
//!
//! Failures are reported once, at their root cause: the leaf holding a
//! dangling reference, or the cycle itself. Leaves that merely lead into a
//! failure are listed as unresolved without a second diagnostic.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use tokens_core::{LeafEntry, Literal, RawValue, TokenDocument, TokenPath};

use crate::graph::ReferenceGraph;
use crate::phase::Phase;

/// A resolution-phase problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveDiagnostic {
    /// A reference names a path that is not a token.
    MissingReference {
        /// Value path of the token holding the reference.
        path: TokenPath,
        /// The path it references.
        target: TokenPath,
    },
    /// References form a cycle. The first and last entries are the same
    /// path.
    CyclicReference {
        /// Value paths around the cycle.
        cycle: Vec<TokenPath>,
    },
}

impl ResolveDiagnostic {
    /// Report group this diagnostic belongs to.
    pub fn phase(&self) -> Phase {
        match self {
            Self::MissingReference { .. } => Phase::MissingReference,
            Self::CyclicReference { .. } => Phase::Cycle,
        }
    }
}

impl fmt::Display for ResolveDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference { path, target } => {
                write!(f, "{path}: reference {{{target}}} does not name a token")
            }
            Self::CyclicReference { cycle } => {
                let chain: Vec<&str> = cycle.iter().map(TokenPath::as_str).collect();
                write!(f, "reference cycle: {}", chain.join(" → "))
            }
        }
    }
}

/// Result of resolving a document.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    values: IndexMap<TokenPath, Literal>,
    unresolved: Vec<TokenPath>,
    diagnostics: Vec<ResolveDiagnostic>,
    graph: ReferenceGraph,
}

impl Resolution {
    /// True if every leaf resolved.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Resolved literal for a value path.
    pub fn get(&self, value_path: &TokenPath) -> Option<&Literal> {
        self.values.get(value_path)
    }

    /// Resolved literals keyed by value path, in document order.
    pub fn values(&self) -> &IndexMap<TokenPath, Literal> {
        &self.values
    }

    /// Value paths of leaves that could not be resolved, in document order.
    pub fn unresolved(&self) -> &[TokenPath] {
        &self.unresolved
    }

    /// Root-cause diagnostics, in the order they were found.
    pub fn diagnostics(&self) -> &[ResolveDiagnostic] {
        &self.diagnostics
    }

    /// Reference edges between existing tokens.
    pub fn graph(&self) -> &ReferenceGraph {
        &self.graph
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Resolved(Literal),
    Failed,
}

#[derive(Debug, Clone)]
enum Visit {
    Unvisited,
    InProgress,
    Done(Outcome),
}

#[derive(Clone, Copy)]
enum Target<'a> {
    Literal(&'a Literal),
    Leaf(usize),
    Missing(&'a TokenPath),
}

struct Resolver<'a> {
    value_paths: Vec<TokenPath>,
    targets: Vec<Target<'a>>,
    state: Vec<Visit>,
    diagnostics: Vec<ResolveDiagnostic>,
}

/// Resolve every leaf of a document.
pub fn resolve(document: &TokenDocument) -> Resolution {
    let leaves = document.leaves();

    let index: HashMap<&TokenPath, usize> = leaves
        .iter()
        .enumerate()
        .map(|(i, l)| (&l.node_path, i))
        .collect();

    let mut graph = ReferenceGraph::default();
    let value_paths: Vec<TokenPath> = leaves.iter().map(LeafEntry::value_path).collect();
    let targets: Vec<Target<'_>> = leaves
        .iter()
        .enumerate()
        .map(|(i, leaf)| match &leaf.leaf.value {
            RawValue::Literal(lit) => Target::Literal(lit),
            RawValue::Reference(target) => match lookup(&index, target) {
                Some(j) => {
                    graph.push(value_paths[i].clone(), value_paths[j].clone());
                    Target::Leaf(j)
                }
                None => Target::Missing(target),
            },
        })
        .collect();

    let mut resolver = Resolver {
        state: vec![Visit::Unvisited; leaves.len()],
        value_paths,
        targets,
        diagnostics: Vec::new(),
    };
    for start in 0..leaves.len() {
        resolver.walk(start);
    }

    let mut values = IndexMap::with_capacity(leaves.len());
    let mut unresolved = Vec::new();
    for (path, visit) in resolver.value_paths.into_iter().zip(resolver.state) {
        match visit {
            Visit::Done(Outcome::Resolved(lit)) => {
                values.insert(path, lit);
            }
            _ => unresolved.push(path),
        }
    }

    tracing::debug!(
        resolved = values.len(),
        unresolved = unresolved.len(),
        edges = graph.len(),
        "reference resolution finished"
    );

    Resolution {
        values,
        unresolved,
        diagnostics: resolver.diagnostics,
        graph,
    }
}

/// A reference may name a leaf by node path or by value path.
fn lookup(index: &HashMap<&TokenPath, usize>, target: &TokenPath) -> Option<usize> {
    index.get(target).copied().or_else(|| {
        target
            .strip_value_suffix()
            .and_then(|node| index.get(&node).copied())
    })
}

impl Resolver<'_> {
    fn walk(&mut self, start: usize) {
        let mut chain: Vec<usize> = Vec::new();
        let mut current = start;

        let outcome = loop {
            match &self.state[current] {
                Visit::Done(outcome) => break outcome.clone(),
                Visit::InProgress => {
                    let entry = chain.iter().position(|&i| i == current).unwrap_or(0);
                    let mut cycle: Vec<TokenPath> = chain[entry..]
                        .iter()
                        .map(|&i| self.value_paths[i].clone())
                        .collect();
                    cycle.push(self.value_paths[current].clone());
                    self.diagnostics
                        .push(ResolveDiagnostic::CyclicReference { cycle });
                    break Outcome::Failed;
                }
                Visit::Unvisited => {
                    self.state[current] = Visit::InProgress;
                    chain.push(current);
                    match self.targets[current] {
                        Target::Literal(lit) => break Outcome::Resolved(lit.clone()),
                        Target::Missing(target) => {
                            self.diagnostics.push(ResolveDiagnostic::MissingReference {
                                path: self.value_paths[current].clone(),
                                target: target.clone(),
                            });
                            break Outcome::Failed;
                        }
                        Target::Leaf(next) => current = next,
                    }
                }
            }
        };

        for i in chain {
            self.state[i] = Visit::Done(outcome.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokens_core::parse_document;

    fn resolve_str(text: &str) -> Resolution {
        resolve(&parse_document(text).unwrap().document)
    }

    fn lit(s: &str) -> Literal {
        Literal::String(s.to_string())
    }

    #[test]
    fn chain_resolves_to_terminal_literal() {
        let r = resolve_str(
            r##"{"a": {"value": "{b}"}, "b": {"value": "{c}"}, "c": {"value": "#112233"}}"##,
        );
        assert!(r.is_ok(), "{:?}", r.diagnostics());
        assert_eq!(r.get(&TokenPath::new("a.value")), Some(&lit("#112233")));
        assert_eq!(r.get(&TokenPath::new("b.value")), Some(&lit("#112233")));
        assert_eq!(r.graph().len(), 2);
    }

    #[test]
    fn value_path_references_resolve() {
        let r = resolve_str(
            r##"{"color": {"brand": {"value": "#5739FB"}, "accent": {"value": "{color.brand.value}"}}}"##,
        );
        assert_eq!(
            r.get(&TokenPath::new("color.accent.value")),
            Some(&lit("#5739FB"))
        );
    }

    #[test]
    fn two_node_cycle_names_both_paths() {
        let r = resolve_str(r#"{"a": {"value": "{b}"}, "b": {"value": "{a}"}}"#);
        assert_eq!(
            r.diagnostics(),
            [ResolveDiagnostic::CyclicReference {
                cycle: vec![
                    TokenPath::new("a.value"),
                    TokenPath::new("b.value"),
                    TokenPath::new("a.value"),
                ]
            }]
        );
        assert_eq!(
            r.diagnostics()[0].to_string(),
            "reference cycle: a.value → b.value → a.value"
        );
        assert!(r.values().is_empty());
        assert_eq!(r.unresolved().len(), 2);
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let r = resolve_str(r#"{"a": {"value": "{a}"}}"#);
        assert_eq!(
            r.diagnostics()[0].to_string(),
            "reference cycle: a.value → a.value"
        );
    }

    #[test]
    fn cycle_entered_from_a_tail_is_reported_once() {
        let r = resolve_str(
            r#"{"x": {"value": "{a}"}, "a": {"value": "{b}"}, "b": {"value": "{a}"}, "y": {"value": "{b}"}}"#,
        );
        assert_eq!(r.diagnostics().len(), 1);
        assert_eq!(
            r.diagnostics()[0].to_string(),
            "reference cycle: a.value → b.value → a.value"
        );
        assert_eq!(r.unresolved().len(), 4);
    }

    #[test]
    fn missing_reference_is_reported_at_its_holder() {
        let r = resolve_str(
            r#"{"a": {"value": "{b}"}, "b": {"value": "{nowhere.token}"}, "c": {"value": "1px"}}"#,
        );
        assert_eq!(
            r.diagnostics(),
            [ResolveDiagnostic::MissingReference {
                path: TokenPath::new("b.value"),
                target: TokenPath::new("nowhere.token"),
            }]
        );
        assert_eq!(
            r.unresolved(),
            [TokenPath::new("a.value"), TokenPath::new("b.value")]
        );
        assert_eq!(r.get(&TokenPath::new("c.value")), Some(&lit("1px")));
    }

    #[test]
    fn reference_to_a_group_is_missing() {
        let r = resolve_str(
            r##"{"color": {"brand": {"value": "#fff"}}, "alias": {"value": "{color}"}}"##,
        );
        assert!(matches!(
            r.diagnostics(),
            [ResolveDiagnostic::MissingReference { .. }]
        ));
    }

    #[test]
    fn all_diagnostics_are_aggregated() {
        let r = resolve_str(
            r#"{"a": {"value": "{b}"}, "b": {"value": "{a}"}, "c": {"value": "{gone}"}, "d": {"value": "{d}"}}"#,
        );
        let phases: Vec<Phase> = r.diagnostics().iter().map(ResolveDiagnostic::phase).collect();
        assert_eq!(phases, [Phase::Cycle, Phase::MissingReference, Phase::Cycle]);
    }

    #[test]
    fn cycle_edges_stay_in_the_graph() {
        let r = resolve_str(r#"{"a": {"value": "{b}"}, "b": {"value": "{a}"}}"#);
        let edges: Vec<String> = r.graph().edges().iter().map(|e| e.to_string()).collect();
        assert_eq!(edges, ["a.value → b.value", "b.value → a.value"]);
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let depth = 50_000;
        let mut text = String::from("{\"t\": {");
        for i in 0..depth {
            text.push_str(&format!("\"n{i}\": {{\"value\": \"{{t.n{}}}\"}},", i + 1));
        }
        text.push_str(&format!("\"n{depth}\": {{\"value\": \"4px\"}}}}}}"));
        let r = resolve_str(&text);
        assert!(r.is_ok());
        assert_eq!(r.get(&TokenPath::new("t.n0.value")), Some(&lit("4px")));
    }
}
