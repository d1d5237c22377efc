//! Report groups.

use std::fmt;

/// Check a diagnostic came from, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Schema,
    MissingReference,
    Cycle,
    Layering,
}

impl Phase {
    /// Every phase, in the order reports print them.
    pub const ALL: [Phase; 4] = [
        Phase::Schema,
        Phase::MissingReference,
        Phase::Cycle,
        Phase::Layering,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::MissingReference => "missing-reference",
            Self::Cycle => "cycle",
            Self::Layering => "layering",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
