//! # tokens-emit — Artifact Emitters
//!
//! Pure functions from a [`ResolvedTokens`] set to artifact text. Identical
//! input renders byte-identical output. Nothing here touches the filesystem;
//! the driver decides file names and writes.
//!
//! | Artifact | Emitter |
//! |----------|---------|
//! | `tokens.css` | [`render_css`] |
//! | `theme.ts` | [`render_typescript`] |
//! | `index.d.ts` | [`render_declarations`] |
//! | `tokens.ios.json`, `tokens.android.json` | [`render_platform_json`] |

pub mod css;
pub mod platform;
pub mod resolved;
pub mod typescript;

use std::fmt;

pub use css::render_css;
pub use platform::{render_platform_json, Platform};
pub use resolved::{
    flatten, EmitError, ResolvedLeaf, ResolvedNode, ResolvedToken, ResolvedTokens, ResolvedTree,
};
pub use typescript::{render_declarations, render_typescript};

/// The kinds of artifact a build produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// CSS custom properties.
    Css,
    /// Typed module with the token object.
    TypeScript,
    /// Type declarations for the typed module.
    Declarations,
    /// Platform token tree.
    Platform(Platform),
}

impl ArtifactKind {
    /// Every kind, in emission order.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Css,
        ArtifactKind::TypeScript,
        ArtifactKind::Declarations,
        ArtifactKind::Platform(Platform::Ios),
        ArtifactKind::Platform(Platform::Android),
    ];

    /// Conventional file name.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Css => "tokens.css",
            Self::TypeScript => "theme.ts",
            Self::Declarations => "index.d.ts",
            Self::Platform(Platform::Ios) => "tokens.ios.json",
            Self::Platform(Platform::Android) => "tokens.android.json",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css => f.write_str("css"),
            Self::TypeScript => f.write_str("typescript"),
            Self::Declarations => f.write_str("declarations"),
            Self::Platform(p) => write!(f, "{p}"),
        }
    }
}

/// One rendered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// What was rendered.
    pub kind: ArtifactKind,
    /// Full file contents.
    pub contents: String,
}

/// Render a single artifact.
///
/// # Errors
///
/// `EmitError::Serialize` from the platform emitters.
pub fn render(kind: ArtifactKind, resolved: &ResolvedTokens) -> Result<Artifact, EmitError> {
    let contents = match kind {
        ArtifactKind::Css => render_css(&resolved.tokens),
        ArtifactKind::TypeScript => render_typescript(resolved),
        ArtifactKind::Declarations => render_declarations(resolved),
        ArtifactKind::Platform(platform) => render_platform_json(&resolved.tree, platform)?,
    };
    tracing::debug!(artifact = %kind, bytes = contents.len(), "rendered artifact");
    Ok(Artifact { kind, contents })
}

/// Render every artifact in [`ArtifactKind::ALL`] order.
///
/// # Errors
///
/// The first [`EmitError`]; nothing partial is returned.
pub fn render_all(resolved: &ResolvedTokens) -> Result<Vec<Artifact>, EmitError> {
    ArtifactKind::ALL
        .iter()
        .map(|&kind| render(kind, resolved))
        .collect()
}
