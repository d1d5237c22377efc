//! Platform JSON emitters (`tokens.ios.json`, `tokens.android.json`).
//!
//! Both platforms currently receive the same pretty-printed resolved tree.
//! No unit conversion or platform naming is applied.

use std::fmt;

use crate::resolved::{EmitError, ResolvedTree};

/// A native platform target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// iOS.
    Ios,
    /// Android.
    Android,
}

impl Platform {
    /// Lower-case platform name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the resolved tree for a platform.
///
/// # Errors
///
/// `EmitError::Serialize` if the tree cannot be serialized.
pub fn render_platform_json(tree: &ResolvedTree, platform: Platform) -> Result<String, EmitError> {
    let mut out = serde_json::to_string_pretty(tree).map_err(|source| EmitError::Serialize {
        artifact: match platform {
            Platform::Ios => "iOS token JSON",
            Platform::Android => "Android token JSON",
        },
        source,
    })?;
    out.push('\n');
    Ok(out)
}
