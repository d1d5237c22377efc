//! # tokens-schema — Loading & Schema Validation
//!
//! The first two phases of the pipeline.
//!
//! ## Loader (`loader`)
//!
//! [`load_inputs`] reads the token document and the constraint document.
//! Missing files, unreadable files and malformed content are fatal
//! [`LoadError`]s that abort the run.
//!
//! ## Constraints (`constraint`)
//!
//! [`SchemaConstraint`] is the interpreted constraint document: required
//! categories, per-category value formats and an optional JSON Schema for the
//! raw token document. Constraint documents are themselves validated against
//! an embedded Draft 2020-12 meta-schema.
//!
//! ## Validation (`validate`)
//!
//! [`validate_document`] runs every structural and format rule in aggregate
//! mode and returns a [`ValidationReport`]. A report that is not ok means the
//! document must not be resolved. [`check_resolved_formats`] applies the same
//! formats to references once they have values.
//!
//! ## Crate Policy
//!
//! - Depends only on `tokens-core` internally.
//! - Schema compilation never touches the network.

pub mod constraint;
pub mod loader;
pub mod validate;

pub use constraint::{ConstraintError, SchemaConstraint, ValueFormat};
pub use loader::{load_constraint, load_document, load_inputs, Inputs, LoadError};
pub use validate::{check_resolved_formats, validate_document, FieldError, ValidationReport};
