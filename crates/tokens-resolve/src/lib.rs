//! # tokens-resolve — Reference Resolution & Layering
//!
//! Runs after schema validation has passed.
//!
//! - [`resolve`] follows every reference chain to its terminal literal and
//!   reports dangling references and cycles in aggregate.
//! - [`check_layering`] checks every reference edge against the configured
//!   [`LayerMap`], so a primitive can never depend on a component.
//!
//! Both phases read the same [`ReferenceGraph`], built once during
//! resolution.

pub mod graph;
pub mod layering;
pub mod phase;
pub mod resolver;

pub use graph::{ReferenceEdge, ReferenceGraph};
pub use layering::{check_layering, LayerConfigError, LayerMap, LayeringViolation};
pub use phase::Phase;
pub use resolver::{resolve, Resolution, ResolveDiagnostic};
