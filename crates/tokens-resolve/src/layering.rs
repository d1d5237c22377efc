//! # Layering Enforcer
//!
//! Every token belongs to exactly one layer. Layers form a total order from
//! most generic (rank 0) to most specific. A reference may point at the same
//! layer or a more generic one, never at a more specific one.
//!
//! Layer membership is decided by dotted-prefix assignments. The longest
//! matching prefix wins, and prefixes match whole segments only: `sem` does
//! not claim `semantic.surface`.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use tokens_core::TokenPath;

use crate::graph::ReferenceGraph;

/// Invalid layer configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayerConfigError {
    /// No layers were configured.
    #[error("layer order is empty")]
    EmptyOrder,

    /// A layer name appears twice in the order.
    #[error("layer `{0}` appears more than once in the layer order")]
    DuplicateLayer(String),

    /// A default or assignment names a layer not in the order.
    #[error("{context} names unknown layer `{layer}`")]
    UnknownLayer {
        /// The unknown layer name.
        layer: String,
        /// Where it was named.
        context: String,
    },

    /// The same prefix is assigned twice.
    #[error("prefix `{0}` is assigned more than once")]
    DuplicatePrefix(String),
}

#[derive(Debug, Clone)]
struct Assignment {
    prefix: String,
    depth: usize,
    rank: usize,
}

/// Layer order plus the prefix assignments that place tokens in layers.
#[derive(Debug, Clone)]
pub struct LayerMap {
    order: Vec<String>,
    default_rank: usize,
    assignments: Vec<Assignment>,
}

impl LayerMap {
    /// Build a layer map.
    ///
    /// `order` lists layers from most generic to most specific. Tokens no
    /// assignment claims live in `default`.
    ///
    /// # Errors
    ///
    /// [`LayerConfigError`] for an empty order, duplicate layer names,
    /// unknown layers, or duplicate prefixes.
    pub fn new<I>(order: Vec<String>, default: &str, assign: I) -> Result<Self, LayerConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if order.is_empty() {
            return Err(LayerConfigError::EmptyOrder);
        }
        let mut ranks: HashMap<&str, usize> = HashMap::with_capacity(order.len());
        for (rank, layer) in order.iter().enumerate() {
            if ranks.insert(layer.as_str(), rank).is_some() {
                return Err(LayerConfigError::DuplicateLayer(layer.clone()));
            }
        }

        let default_rank = *ranks.get(default).ok_or_else(|| LayerConfigError::UnknownLayer {
            layer: default.to_string(),
            context: "default layer".to_string(),
        })?;

        let mut assignments: Vec<Assignment> = Vec::new();
        for (prefix, layer) in assign {
            let rank = *ranks
                .get(layer.as_str())
                .ok_or_else(|| LayerConfigError::UnknownLayer {
                    layer: layer.clone(),
                    context: format!("assignment for `{prefix}`"),
                })?;
            if assignments.iter().any(|a| a.prefix == prefix) {
                return Err(LayerConfigError::DuplicatePrefix(prefix));
            }
            assignments.push(Assignment {
                depth: prefix.split('.').count(),
                prefix,
                rank,
            });
        }
        // Deepest prefix first, so the first match is the longest one.
        assignments.sort_by(|a, b| b.depth.cmp(&a.depth));

        Ok(Self {
            order,
            default_rank,
            assignments,
        })
    }

    /// `primitive < semantic < component`; the `semantic` and `component`
    /// categories are assigned to their namesake layers, everything else is
    /// primitive.
    pub fn standard() -> Self {
        Self {
            order: vec![
                "primitive".to_string(),
                "semantic".to_string(),
                "component".to_string(),
            ],
            default_rank: 0,
            assignments: vec![
                Assignment {
                    prefix: "semantic".to_string(),
                    depth: 1,
                    rank: 1,
                },
                Assignment {
                    prefix: "component".to_string(),
                    depth: 1,
                    rank: 2,
                },
            ],
        }
    }

    /// Rank of the layer a token belongs to.
    pub fn rank_of(&self, path: &TokenPath) -> usize {
        self.assignments
            .iter()
            .find(|a| path.starts_with_segments(&a.prefix))
            .map_or(self.default_rank, |a| a.rank)
    }

    /// Name of the layer a token belongs to.
    pub fn layer_of(&self, path: &TokenPath) -> &str {
        &self.order[self.rank_of(path)]
    }

    /// Whether a token in `from`'s layer may reference a token in `to`'s.
    pub fn permits(&self, from: &TokenPath, to: &TokenPath) -> bool {
        self.rank_of(to) <= self.rank_of(from)
    }
}

impl Default for LayerMap {
    fn default() -> Self {
        Self::standard()
    }
}

/// A reference from a more generic layer into a more specific one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeringViolation {
    /// Value path of the referencing token.
    pub from: TokenPath,
    /// Value path of the referenced token.
    pub to: TokenPath,
    /// Layer of the referencing token.
    pub from_layer: String,
    /// Layer of the referenced token.
    pub to_layer: String,
}

impl fmt::Display for LayeringViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) → {} ({}): may not reference a more specific layer",
            self.from, self.from_layer, self.to, self.to_layer
        )
    }
}

/// Check every reference edge against the layer order.
///
/// Violations come back in edge order.
pub fn check_layering(graph: &ReferenceGraph, layers: &LayerMap) -> Vec<LayeringViolation> {
    let violations: Vec<LayeringViolation> = graph
        .edges()
        .iter()
        .filter(|edge| !layers.permits(&edge.from, &edge.to))
        .map(|edge| LayeringViolation {
            from: edge.from.clone(),
            to: edge.to.clone(),
            from_layer: layers.layer_of(&edge.from).to_string(),
            to_layer: layers.layer_of(&edge.to).to_string(),
        })
        .collect();
    tracing::debug!(
        edges = graph.len(),
        violations = violations.len(),
        "layering checked"
    );
    violations
}
