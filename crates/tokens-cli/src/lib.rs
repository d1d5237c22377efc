//! # tokens-cli — The `tokens` Command
//!
//! Drives the design-token pipeline end to end.
//!
//! ```bash
//! # Full build: validate, resolve, check layering, write all artifacts.
//! tokens
//!
//! # Run every check and write nothing.
//! tokens --validate-only
//!
//! # Explicit configuration and output directory.
//! tokens --config design/tokens.config.yaml --out-dir build/tokens
//! ```
//!
//! ## Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | fatal: configuration, unreadable or malformed input, write failure |
//! | 2 | validation failure: schema, missing reference, cycle, layering |
//!
//! Scripts should rely on the exit code. The diagnostic text on stderr is for
//! people.

pub mod config;
pub mod pipeline;
pub mod report;

pub use config::{Overrides, PipelineConfig};
pub use pipeline::{run, Mode, Outcome};
pub use report::Report;

/// Run completed and every check passed.
pub const EXIT_OK: u8 = 0;
/// Run aborted on a fatal error.
pub const EXIT_FATAL: u8 = 1;
/// Run completed and found validation problems.
pub const EXIT_INVALID: u8 = 2;
