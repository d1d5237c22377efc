//! # tokens-core — Foundational Types for the Design-Token Pipeline
//!
//! This crate is the leaf of the pipeline's crate DAG. It defines the typed
//! token tree that every later phase walks, along with the two pure functions
//! the rest of the workspace leans on: the reference parser and the CSS
//! variable naming rule.
//!
//! ## Key Design Principles
//!
//! 1. **Leaf vs group is a type-level fact.** `TokenNode` is a tagged variant.
//!    After [`parse_document`] nothing downstream looks for a `value` key.
//!
//! 2. **Insertion order is preserved.** Documents and groups are
//!    `IndexMap`s so emission order follows the source file and artifacts are
//!    diffable across runs.
//!
//! 3. **References are parsed, not sniffed.** [`RawValue`] is either a
//!    [`Literal`] or a `Reference(TokenPath)`, produced by
//!    [`parse_raw_value`]. A brace-wrapped string that is not a valid path is
//!    a literal.
//!
//! 4. **`TokenPath` newtype.** Node paths and value paths are never bare
//!    strings.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tokens-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod error;
pub mod naming;
pub mod path;
pub mod value;

pub use document::{parse_document, LeafEntry, NodeEntry, ParsedDocument, TokenDocument, TokenGroup, TokenNode, Leaf};
pub use error::{NamingError, ParseError};
pub use naming::{kebab_segment, CssNaming};
pub use path::TokenPath;
pub use value::{parse_raw_value, Literal, RawValue};
