//! # Reference Graph
//!
//! Nodes are token value paths; an edge `A → B` means `A`'s raw value is a
//! reference to `B`. Only references whose target exists produce edges.
//! Edges are kept in document order so everything derived from the graph is
//! deterministic.

use std::fmt;

use tokens_core::TokenPath;

/// One reference between two existing tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEdge {
    /// Value path of the referencing token.
    pub from: TokenPath,
    /// Value path of the referenced token.
    pub to: TokenPath,
}

impl fmt::Display for ReferenceEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.from, self.to)
    }
}

/// All reference edges of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceGraph {
    edges: Vec<ReferenceEdge>,
}

impl ReferenceGraph {
    pub(crate) fn push(&mut self, from: TokenPath, to: TokenPath) {
        self.edges.push(ReferenceEdge { from, to });
    }

    /// Edges in document order of their source token.
    pub fn edges(&self) -> &[ReferenceEdge] {
        &self.edges
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the document has no resolvable references.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromIterator<ReferenceEdge> for ReferenceGraph {
    fn from_iter<I: IntoIterator<Item = ReferenceEdge>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}
