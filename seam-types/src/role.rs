//! Backing source roles.

use core::fmt;
use serde::{Deserialize, Serialize};

/// Which side of the historical/live boundary a backing source serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceRole {
    /// Bulk store covering everything strictly before today's local midnight.
    Historical,
    /// Brokerage-backed source covering the still-open current day.
    Live,
}

impl SourceRole {
    /// Stable lowercase identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Live => "live",
        }
    }
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
